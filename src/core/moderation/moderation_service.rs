// Moderation service - warnings and the blacklist.
//
// NO Discord dependencies here - just domain logic over a storage port.
// Kicks, bans and other gateway actions stay in the Discord layer; this
// service only owns the state the bot persists itself.

use super::moderation_models::{BlacklistEntry, WarnOutcome, Warning};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("storage error: {0}")]
    Store(String),

    #[error("warning #{id} not found for that user")]
    WarningNotFound { id: i64 },
}

/// Trait for persisting warnings and the blacklist.
#[async_trait]
pub trait ModerationStore: Send + Sync {
    /// Persist a new warning and return it with its assigned id.
    async fn add_warning(
        &self,
        user_id: u64,
        guild_id: u64,
        moderator_id: u64,
        reason: &str,
    ) -> Result<Warning, ModerationError>;

    /// Delete a warning by id, scoped to (user, guild). Returns false if no
    /// such warning exists for that user.
    async fn remove_warning(
        &self,
        id: i64,
        user_id: u64,
        guild_id: u64,
    ) -> Result<bool, ModerationError>;

    /// All warnings for a user in a guild, oldest first.
    async fn list_warnings(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Vec<Warning>, ModerationError>;

    async fn count_warnings(&self, user_id: u64, guild_id: u64) -> Result<u32, ModerationError>;

    /// Add a user to the blacklist. Returns false if already present.
    async fn blacklist_add(&self, user_id: u64) -> Result<bool, ModerationError>;

    /// Remove a user from the blacklist. Returns false if not present.
    async fn blacklist_remove(&self, user_id: u64) -> Result<bool, ModerationError>;

    async fn blacklist_contains(&self, user_id: u64) -> Result<bool, ModerationError>;

    async fn blacklist_all(&self) -> Result<Vec<BlacklistEntry>, ModerationError>;
}

pub struct ModerationService<S: ModerationStore> {
    store: S,
}

impl<S: ModerationStore> ModerationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Issue a warning and report the user's new total.
    pub async fn warn(
        &self,
        user_id: u64,
        guild_id: u64,
        moderator_id: u64,
        reason: &str,
    ) -> Result<WarnOutcome, ModerationError> {
        let reason = if reason.trim().is_empty() {
            "No reason given"
        } else {
            reason.trim()
        };

        let warning = self
            .store
            .add_warning(user_id, guild_id, moderator_id, reason)
            .await?;
        let total_warnings = self.store.count_warnings(user_id, guild_id).await?;

        Ok(WarnOutcome {
            warning,
            total_warnings,
        })
    }

    /// Remove a single warning by id. The (user, guild) scope prevents a
    /// moderator from deleting another guild's warning by guessing ids.
    pub async fn remove_warning(
        &self,
        id: i64,
        user_id: u64,
        guild_id: u64,
    ) -> Result<(), ModerationError> {
        if self.store.remove_warning(id, user_id, guild_id).await? {
            Ok(())
        } else {
            Err(ModerationError::WarningNotFound { id })
        }
    }

    pub async fn warnings_for(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Vec<Warning>, ModerationError> {
        self.store.list_warnings(user_id, guild_id).await
    }

    pub async fn blacklist_add(&self, user_id: u64) -> Result<bool, ModerationError> {
        self.store.blacklist_add(user_id).await
    }

    pub async fn blacklist_remove(&self, user_id: u64) -> Result<bool, ModerationError> {
        self.store.blacklist_remove(user_id).await
    }

    pub async fn is_blacklisted(&self, user_id: u64) -> Result<bool, ModerationError> {
        self.store.blacklist_contains(user_id).await
    }

    pub async fn blacklist(&self) -> Result<Vec<BlacklistEntry>, ModerationError> {
        self.store.blacklist_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// In-memory store for testing
    struct MockModerationStore {
        warnings: DashMap<(u64, u64), Vec<Warning>>,
        blacklist: DashMap<u64, BlacklistEntry>,
        next_id: AtomicI64,
    }

    impl MockModerationStore {
        fn new() -> Self {
            Self {
                warnings: DashMap::new(),
                blacklist: DashMap::new(),
                next_id: AtomicI64::new(1),
            }
        }
    }

    #[async_trait]
    impl ModerationStore for MockModerationStore {
        async fn add_warning(
            &self,
            user_id: u64,
            guild_id: u64,
            moderator_id: u64,
            reason: &str,
        ) -> Result<Warning, ModerationError> {
            let warning = Warning {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                user_id,
                guild_id,
                moderator_id,
                reason: reason.to_string(),
                created_at: Utc::now(),
            };
            self.warnings
                .entry((user_id, guild_id))
                .or_default()
                .push(warning.clone());
            Ok(warning)
        }

        async fn remove_warning(
            &self,
            id: i64,
            user_id: u64,
            guild_id: u64,
        ) -> Result<bool, ModerationError> {
            if let Some(mut list) = self.warnings.get_mut(&(user_id, guild_id)) {
                let before = list.len();
                list.retain(|w| w.id != id);
                return Ok(list.len() < before);
            }
            Ok(false)
        }

        async fn list_warnings(
            &self,
            user_id: u64,
            guild_id: u64,
        ) -> Result<Vec<Warning>, ModerationError> {
            Ok(self
                .warnings
                .get(&(user_id, guild_id))
                .map(|w| w.clone())
                .unwrap_or_default())
        }

        async fn count_warnings(
            &self,
            user_id: u64,
            guild_id: u64,
        ) -> Result<u32, ModerationError> {
            Ok(self
                .warnings
                .get(&(user_id, guild_id))
                .map(|w| w.len() as u32)
                .unwrap_or(0))
        }

        async fn blacklist_add(&self, user_id: u64) -> Result<bool, ModerationError> {
            if self.blacklist.contains_key(&user_id) {
                return Ok(false);
            }
            self.blacklist.insert(
                user_id,
                BlacklistEntry {
                    user_id,
                    created_at: Utc::now(),
                },
            );
            Ok(true)
        }

        async fn blacklist_remove(&self, user_id: u64) -> Result<bool, ModerationError> {
            Ok(self.blacklist.remove(&user_id).is_some())
        }

        async fn blacklist_contains(&self, user_id: u64) -> Result<bool, ModerationError> {
            Ok(self.blacklist.contains_key(&user_id))
        }

        async fn blacklist_all(&self) -> Result<Vec<BlacklistEntry>, ModerationError> {
            Ok(self.blacklist.iter().map(|e| e.value().clone()).collect())
        }
    }

    #[tokio::test]
    async fn warn_reports_running_total() {
        let service = ModerationService::new(MockModerationStore::new());

        let first = service.warn(1, 10, 99, "spamming").await.unwrap();
        assert_eq!(first.total_warnings, 1);
        assert_eq!(first.warning.reason, "spamming");

        let second = service.warn(1, 10, 99, "still spamming").await.unwrap();
        assert_eq!(second.total_warnings, 2);
        assert_ne!(first.warning.id, second.warning.id);
    }

    #[tokio::test]
    async fn blank_warn_reason_gets_a_placeholder() {
        let service = ModerationService::new(MockModerationStore::new());

        let outcome = service.warn(1, 10, 99, "   ").await.unwrap();
        assert_eq!(outcome.warning.reason, "No reason given");
    }

    #[tokio::test]
    async fn warnings_are_scoped_per_guild() {
        let service = ModerationService::new(MockModerationStore::new());

        service.warn(1, 10, 99, "guild ten").await.unwrap();
        service.warn(1, 20, 99, "guild twenty").await.unwrap();

        let in_ten = service.warnings_for(1, 10).await.unwrap();
        assert_eq!(in_ten.len(), 1);
        assert_eq!(in_ten[0].reason, "guild ten");
    }

    #[tokio::test]
    async fn remove_warning_requires_matching_user_and_guild() {
        let service = ModerationService::new(MockModerationStore::new());

        let outcome = service.warn(1, 10, 99, "spam").await.unwrap();
        let id = outcome.warning.id;

        // Wrong guild - refused
        let result = service.remove_warning(id, 1, 20).await;
        assert!(matches!(result, Err(ModerationError::WarningNotFound { .. })));

        // Right scope - removed
        service.remove_warning(id, 1, 10).await.unwrap();
        assert!(service.warnings_for(1, 10).await.unwrap().is_empty());

        // Removing twice is an error
        let result = service.remove_warning(id, 1, 10).await;
        assert!(matches!(result, Err(ModerationError::WarningNotFound { .. })));
    }

    #[tokio::test]
    async fn blacklist_add_is_idempotent_and_reported() {
        let service = ModerationService::new(MockModerationStore::new());

        assert!(service.blacklist_add(5).await.unwrap());
        assert!(!service.blacklist_add(5).await.unwrap());
        assert!(service.is_blacklisted(5).await.unwrap());

        assert!(service.blacklist_remove(5).await.unwrap());
        assert!(!service.blacklist_remove(5).await.unwrap());
        assert!(!service.is_blacklisted(5).await.unwrap());
    }
}
