// Process-wide configuration, loaded once at startup.
//
// Everything comes from environment variables (optionally via a .env file)
// so secrets never land in the repo. Values are read a single time and held
// in `BotConfig` for the lifetime of the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing DISCORD_TOKEN environment variable - create a .env file with your bot token")]
    MissingToken,

    #[error("TEST_GUILD_ID is not a valid guild id: {0}")]
    InvalidGuildId(String),
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Secret gateway credential. Required.
    pub discord_token: String,
    /// Prefix for text commands. Slash commands are unaffected.
    pub prefix: String,
    /// When set, slash commands register in this guild only (instant
    /// propagation during development). Otherwise they register globally.
    pub test_guild_id: Option<u64>,
    /// DeepSeek API key for joke analysis. Optional - the feature degrades
    /// to a "not configured" notice without it.
    pub deepseek_api_key: Option<String>,
    pub deepseek_model: String,
    /// SQLite file holding warnings and the blacklist.
    pub database_path: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build config from any name -> value lookup. Split out from
    /// `from_env` so tests don't have to mutate the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let test_guild_id = match lookup("TEST_GUILD_ID") {
            Some(raw) => {
                let parsed = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidGuildId(raw.clone()))?;
                // Snowflakes are never zero, and GuildId::new(0) panics
                if parsed == 0 {
                    return Err(ConfigError::InvalidGuildId(raw));
                }
                Some(parsed)
            }
            None => None,
        };

        Ok(Self {
            discord_token,
            prefix: lookup("BOT_PREFIX").unwrap_or_else(|| "!".to_string()),
            test_guild_id,
            deepseek_api_key: lookup("DEEPSEEK_API_KEY").filter(|k| !k.trim().is_empty()),
            deepseek_model: lookup("DEEPSEEK_MODEL").unwrap_or_else(|| "deepseek-chat".to_string()),
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "data/mortis.db".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn token_is_required() {
        let result = BotConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn blank_token_is_rejected() {
        let result = BotConfig::from_lookup(lookup_from(&[("DISCORD_TOKEN", "   ")]));
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = BotConfig::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc123")])).unwrap();

        assert_eq!(config.discord_token, "abc123");
        assert_eq!(config.prefix, "!");
        assert_eq!(config.test_guild_id, None);
        assert_eq!(config.deepseek_api_key, None);
        assert_eq!(config.deepseek_model, "deepseek-chat");
        assert_eq!(config.database_path, "data/mortis.db");
    }

    #[test]
    fn full_configuration_round_trips() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc123"),
            ("BOT_PREFIX", "?"),
            ("TEST_GUILD_ID", "1234567890"),
            ("DEEPSEEK_API_KEY", "sk-test"),
            ("DEEPSEEK_MODEL", "deepseek-reasoner"),
            ("DATABASE_PATH", "/tmp/bot.db"),
        ]))
        .unwrap();

        assert_eq!(config.prefix, "?");
        assert_eq!(config.test_guild_id, Some(1234567890));
        assert_eq!(config.deepseek_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.deepseek_model, "deepseek-reasoner");
        assert_eq!(config.database_path, "/tmp/bot.db");
    }

    #[test]
    fn zero_guild_id_is_an_error() {
        let result = BotConfig::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc123"),
            ("TEST_GUILD_ID", "0"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidGuildId(_))));
    }

    #[test]
    fn bad_guild_id_is_an_error() {
        let result = BotConfig::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc123"),
            ("TEST_GUILD_ID", "not-a-number"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidGuildId(_))));
    }
}
