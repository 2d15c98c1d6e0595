// Moderation domain models.
//
// Pure domain types with no Discord dependencies. The Discord layer turns
// these into embeds and notices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A warning issued to a user in a guild.
///
/// The id is assigned by the store and is unique per database, so
/// moderators can reference and remove individual warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub id: i64,
    pub user_id: u64,
    pub guild_id: u64,
    pub moderator_id: u64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// A user barred from using the bot anywhere. The blacklist is per-bot,
/// not per-guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
}

/// Result of issuing a warning: the stored warning plus the user's running
/// total, so the caller can report "warning N".
#[derive(Debug, Clone)]
pub struct WarnOutcome {
    pub warning: Warning,
    pub total_warnings: u32,
}
