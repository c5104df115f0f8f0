//! Bearer authentication.

use crate::claims::{claim_types, Claim, Principal};
use crate::config::DevToken;
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Malformed authorization header")]
    MalformedHeader,

    #[error("Invalid bearer token")]
    InvalidToken,
}

/// Verifies bearer tokens and yields the caller's claims.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Fixed token table for development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, Principal>,
}

impl StaticIdentityProvider {
    pub fn new(tokens: &[DevToken]) -> Self {
        let tokens = tokens
            .iter()
            .map(|dev| {
                let mut claims = vec![Claim::new(claim_types::SUBJECT, &dev.subject)];
                if let Some(email) = &dev.email {
                    claims.push(Claim::new(claim_types::EMAIL, email));
                }
                if let Some(name) = &dev.name {
                    claims.push(Claim::new(claim_types::NAME, name));
                }
                (dev.token.clone(), Principal::authenticated(claims))
            })
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}

/// The bearer token of `headers`, if the request carries one.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }
    match token.trim() {
        "" => Err(AuthError::MalformedHeader),
        token => Ok(Some(token)),
    }
}
