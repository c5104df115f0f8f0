//! User actor: registration and tenant memberships of one identity.
//!
//! Keyed by the identity-provider subject id. All calls for an identity are
//! served by its single activation, which is the only writer of the identity's
//! `users` record.

pub mod entity;
pub mod error;
mod requests;

pub use entity::{UserActor, UserActorContext};
pub use error::*;
pub use requests::*;

use crate::clients::UserClient;
use crate::store::EntityStore;
use grain_runtime::{ActorDirectory, DirectoryConfig};
use std::sync::Arc;

/// Creates the User actor directory and its client.
pub fn new(
    store: Arc<dyn EntityStore>,
    config: DirectoryConfig,
) -> (ActorDirectory<UserActor>, UserClient) {
    let directory = ActorDirectory::new(UserActorContext { store }, config);
    let client = UserClient::new(directory.clone());
    (directory, client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::{MemoryStore, USERS};
    use crate::validation::RegistrationInput;

    fn registration() -> RegistrationInput {
        RegistrationInput {
            email: "a@b.com".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
        }
    }

    fn memory_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new().with_unique_index(USERS, "email"))
    }

    #[tokio::test]
    async fn test_register_twice_keeps_first() {
        let (_directory, users) = new(memory_store(), DirectoryConfig::default());

        let first = users.register("auth0|123", registration()).await.unwrap();
        assert_eq!(first.first_name, "John");

        let second = users
            .register(
                "auth0|123",
                RegistrationInput {
                    email: "other@b.com".into(),
                    first_name: "Jane".into(),
                    last_name: "Roe".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(second, UserError::AlreadyRegistered { .. }));
        assert_eq!(second.kind(), ErrorKind::Conflict);
        assert_eq!(second.to_string(), "Identity already registered: auth0|123");

        let profile = users.get_profile("auth0|123").await.unwrap().unwrap();
        assert_eq!(profile, first);
    }

    #[tokio::test]
    async fn test_unregistered_user_reads() {
        let (_directory, users) = new(memory_store(), DirectoryConfig::default());

        assert!(users.get_profile("nobody").await.unwrap().is_none());
        assert!(users.get_tenants("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_email_unique_across_identities() {
        let (_directory, users) = new(memory_store(), DirectoryConfig::default());
        users.register("auth0|1", registration()).await.unwrap();

        let mut shouting = registration();
        shouting.email = "A@B.COM".into();
        let err = users.register("auth0|2", shouting).await.unwrap_err();
        assert!(matches!(err, UserError::EmailTaken { .. }));

        // The failed registration left the second identity unregistered.
        assert!(users.get_profile("auth0|2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_grant_membership_requires_registration() {
        let (_directory, users) = new(memory_store(), DirectoryConfig::default());
        let err = users
            .grant_membership("nobody", "acme", vec!["owner".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::NotRegistered(_)));
    }

    #[tokio::test]
    async fn test_grant_membership_is_idempotent_and_persisted() {
        let store = memory_store();
        let (directory, users) = new(store.clone(), DirectoryConfig::default());
        users.register("auth0|123", registration()).await.unwrap();

        assert!(users.grant_membership("auth0|123", "acme", vec!["owner".into()]).await.unwrap());
        assert!(!users.grant_membership("auth0|123", "acme", vec!["owner".into()]).await.unwrap());
        assert!(users
            .grant_membership("auth0|123", "globex", vec!["viewer".into()])
            .await
            .unwrap());

        let version = store.get(USERS, "auth0|123").await.unwrap().unwrap().version;
        assert_eq!(version, 3);

        // A fresh activation sees the same memberships.
        directory.shutdown().await.unwrap();
        let (_directory, users) = new(store, DirectoryConfig::default());
        let tenants = users.get_tenants("auth0|123").await.unwrap();
        assert_eq!(tenants.len(), 2);
        assert!(tenants[0].roles.contains("owner"));
    }

    #[tokio::test]
    async fn test_version_conflict_is_surfaced_then_state_reloaded() {
        let store = memory_store();
        let (_directory, users) = new(store.clone(), DirectoryConfig::default());
        users.register("auth0|123", registration()).await.unwrap();

        // Simulate a second writer behind the actor's back.
        let mut record = store.get(USERS, "auth0|123").await.unwrap().unwrap();
        record.document["tenants"] =
            serde_json::json!([{ "tenantId": "initech", "roles": ["admin"] }]);
        store
            .upsert(USERS, "auth0|123", record.document, Some(record.version))
            .await
            .unwrap();

        let err = users
            .grant_membership("auth0|123", "acme", vec!["owner".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::VersionConflict(_)));

        // Next call runs on the reloaded state; a retry now succeeds.
        let tenants = users.get_tenants("auth0|123").await.unwrap();
        assert_eq!(tenants.len(), 1);
        assert_eq!(tenants[0].tenant_id, "initech");
        assert!(users.grant_membership("auth0|123", "acme", vec!["owner".into()]).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_outage_is_infrastructure() {
        let store = memory_store();
        let (_directory, users) = new(store.clone(), DirectoryConfig::default());
        store.set_available(false);

        let err = users.get_tenants("auth0|123").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Infrastructure);

        // Activation is retried once the store is back.
        store.set_available(true);
        assert!(users.get_tenants("auth0|123").await.unwrap().is_empty());
    }
}
