//! Service configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use grain_runtime::DirectoryConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Configuration
// =============================================================================

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener
    pub api: ApiConfig,
    /// Actor runtime tuning, shared by the User and Tenant directories
    pub actors: ActorConfig,
    /// Request pipeline and provisioning settings
    pub tenancy: TenancyConfig,
    /// Bearer tokens accepted by the development identity provider
    pub dev_tokens: Vec<DevToken>,
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Actor runtime configuration.
#[derive(Debug, Clone)]
pub struct ActorConfig {
    pub mailbox_capacity: usize,
    pub call_timeout: Duration,
    /// `None` keeps activations alive until shutdown.
    pub idle_timeout: Option<Duration>,
}

/// Tenancy pipeline configuration.
#[derive(Debug, Clone)]
pub struct TenancyConfig {
    /// Header carrying the tenant system name
    pub header: String,
    /// Upper bound for the whole claims enrichment of one request
    pub enrichment_timeout: Duration,
    /// Role granted to the creator of a tenant
    pub owner_role: String,
    /// Attempts for the membership grant after tenant creation
    pub grant_attempts: u32,
    /// First backoff delay between grant attempts; doubles each time
    pub grant_backoff: Duration,
}

/// One development bearer token and the principal it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevToken {
    pub token: String,
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

impl ActorConfig {
    /// Runtime settings for one actor directory.
    pub fn directory(&self) -> DirectoryConfig {
        DirectoryConfig {
            mailbox_capacity: self.mailbox_capacity,
            call_timeout: self.call_timeout,
            idle_timeout: self.idle_timeout,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api = ApiConfig {
            host: lookup("TENANCY_HOST").unwrap_or(defaults.api.host),
            port: parse(&lookup, "TENANCY_PORT", defaults.api.port)?,
        };

        let mailbox_capacity =
            parse(&lookup, "TENANCY_MAILBOX_CAPACITY", defaults.actors.mailbox_capacity)?;
        if mailbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "TENANCY_MAILBOX_CAPACITY",
                value: "0".into(),
            });
        }
        let idle_secs: u64 = parse(&lookup, "TENANCY_IDLE_TIMEOUT_SECS", 300)?;
        let actors = ActorConfig {
            mailbox_capacity,
            call_timeout: Duration::from_millis(parse(&lookup, "TENANCY_CALL_TIMEOUT_MS", 5000)?),
            idle_timeout: (idle_secs > 0).then(|| Duration::from_secs(idle_secs)),
        };

        let tenancy = TenancyConfig {
            header: lookup("TENANCY_HEADER")
                .map(|h| h.to_ascii_lowercase())
                .unwrap_or(defaults.tenancy.header),
            enrichment_timeout: Duration::from_millis(parse(
                &lookup,
                "TENANCY_ENRICHMENT_TIMEOUT_MS",
                3000,
            )?),
            owner_role: lookup("TENANCY_OWNER_ROLE").unwrap_or(defaults.tenancy.owner_role),
            grant_attempts: parse(
                &lookup,
                "TENANCY_GRANT_ATTEMPTS",
                defaults.tenancy.grant_attempts,
            )?
            .max(1),
            grant_backoff: Duration::from_millis(parse(&lookup, "TENANCY_GRANT_BACKOFF_MS", 50)?),
        };

        let dev_tokens = match lookup("TENANCY_DEV_TOKENS") {
            Some(raw) => parse_dev_tokens(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            api,
            actors,
            tenancy,
            dev_tokens,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            actors: ActorConfig {
                mailbox_capacity: 16,
                call_timeout: Duration::from_secs(2),
                idle_timeout: None,
            },
            tenancy: TenancyConfig {
                grant_backoff: Duration::from_millis(5),
                enrichment_timeout: Duration::from_secs(2),
                ..TenancyConfig::default()
            },
            dev_tokens: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            actors: ActorConfig {
                mailbox_capacity: 32,
                call_timeout: Duration::from_millis(5000),
                idle_timeout: Some(Duration::from_secs(300)),
            },
            tenancy: TenancyConfig::default(),
            dev_tokens: Vec::new(),
        }
    }
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            header: "x-tenant".to_string(),
            enrichment_timeout: Duration::from_millis(3000),
            owner_role: "owner".to_string(),
            grant_attempts: 3,
            grant_backoff: Duration::from_millis(50),
        }
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// Parses `token=subject,email,name` entries separated by `;`. Email and name
/// may be left empty.
fn parse_dev_tokens(raw: &str) -> Result<Vec<DevToken>, ConfigError> {
    let invalid = |entry: &str| ConfigError::Invalid {
        key: "TENANCY_DEV_TOKENS",
        value: entry.to_string(),
    };
    let optional = |part: Option<&str>| {
        part.map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
    };

    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (token, principal) = entry.split_once('=').ok_or_else(|| invalid(entry))?;
            let mut parts = principal.split(',');
            let subject = parts.next().map(str::trim).unwrap_or_default();
            if token.trim().is_empty() || subject.is_empty() {
                return Err(invalid(entry));
            }
            Ok(DevToken {
                token: token.trim().to_string(),
                subject: subject.to_string(),
                email: optional(parts.next()),
                name: optional(parts.next()),
            })
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
