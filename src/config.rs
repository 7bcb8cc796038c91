// Startup configuration, read from the environment (and `.env` via dotenv).

use crate::core::moderation::{EnforcementThresholds, ModerationConfig, MAX_MUTE_DURATION_SECS};
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::str::FromStr;

/// Everything the bot needs before it connects.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub moderation: ModerationConfig,
    /// Delete the message that triggered a violation
    pub delete_link_messages: bool,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .context("Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.")?;

        let admin_ids = match lookup("ADMIN_IDS") {
            Some(raw) => parse_admin_ids(&raw)?,
            None => HashSet::new(),
        };

        let defaults = EnforcementThresholds::default();
        let warn_limit: u32 = parse_or("WARN_LIMIT", lookup("WARN_LIMIT"), defaults.warn_limit)?;
        let mute_duration_secs: u64 = parse_or(
            "MUTE_DURATION_SECONDS",
            lookup("MUTE_DURATION_SECONDS"),
            defaults.mute_duration_secs,
        )?;

        if warn_limit == 0 {
            bail!("WARN_LIMIT must be at least 1");
        }
        if mute_duration_secs == 0 || mute_duration_secs > MAX_MUTE_DURATION_SECS {
            bail!(
                "MUTE_DURATION_SECONDS must be between 1 and {} (28 days)",
                MAX_MUTE_DURATION_SECS
            );
        }

        let delete_link_messages = parse_or(
            "DELETE_LINK_MESSAGES",
            lookup("DELETE_LINK_MESSAGES"),
            true,
        )?;

        Ok(Self {
            discord_token,
            moderation: ModerationConfig {
                admin_ids,
                thresholds: EnforcementThresholds {
                    warn_limit,
                    mute_duration_secs,
                },
            },
            delete_link_messages,
        })
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", name, value)),
    }
}

/// Accepts IDs separated by commas and/or whitespace.
fn parse_admin_ids(raw: &str) -> Result<HashSet<u64>> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .with_context(|| format!("Invalid user ID in ADMIN_IDS: {:?}", part))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<BotConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DISCORD_TOKEN", "abc")]).unwrap();

        assert_eq!(config.discord_token, "abc");
        assert!(config.moderation.admin_ids.is_empty());
        assert_eq!(config.moderation.thresholds.warn_limit, 3);
        assert_eq!(config.moderation.thresholds.mute_duration_secs, 600);
        assert!(config.delete_link_messages);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DISCORD_TOKEN", "abc"),
            ("ADMIN_IDS", "111, 222 333"),
            ("WARN_LIMIT", "5"),
            ("MUTE_DURATION_SECONDS", "60"),
            ("DELETE_LINK_MESSAGES", "false"),
        ])
        .unwrap();

        assert_eq!(
            config.moderation.admin_ids,
            HashSet::from([111, 222, 333])
        );
        assert_eq!(config.moderation.thresholds.warn_limit, 5);
        assert_eq!(config.moderation.thresholds.mute_duration_secs, 60);
        assert!(!config.delete_link_messages);
    }

    #[test]
    fn test_missing_token() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = load(&[("DISCORD_TOKEN", "abc"), ("WARN_LIMIT", "three")]).unwrap_err();
        assert!(err.to_string().contains("WARN_LIMIT"));

        let err = load(&[("DISCORD_TOKEN", "abc"), ("ADMIN_IDS", "12,bob")]).unwrap_err();
        assert!(err.to_string().contains("ADMIN_IDS"));

        assert!(load(&[("DISCORD_TOKEN", "abc"), ("WARN_LIMIT", "0")]).is_err());
    }

    #[test]
    fn test_mute_duration_upper_bound() {
        let config = load(&[
            ("DISCORD_TOKEN", "abc"),
            ("MUTE_DURATION_SECONDS", "2419200"),
        ])
        .unwrap();
        assert_eq!(config.moderation.thresholds.mute_duration_secs, 2_419_200);

        for too_long in ["2419201", "18446744073709551615"] {
            let err = load(&[("DISCORD_TOKEN", "abc"), ("MUTE_DURATION_SECONDS", too_long)])
                .unwrap_err();
            assert!(err.to_string().contains("MUTE_DURATION_SECONDS"));
        }
    }
}
