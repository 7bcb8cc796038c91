// Link detection - decides whether a message is a link-posting violation.
//
// Pure logic: no storage, no platform calls. The escalation service only sees
// messages this detector has classified as violations.

use super::moderation_models::{ChatKind, Classification};
use super::moderation_service::ModerationError;
use regex::Regex;
use std::collections::HashSet;

/// URLs, bare `www.`, chat invite/deep links and e-mail shaped tokens.
const LINK_PATTERN: &str = r"(?i)(https?://|www\.|t\.me/|telegram\.me/|discord\.gg/|discord(?:app)?\.com/invite/|[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,})";

/// Classifies messages against the link pattern and the admin set.
pub struct LinkDetector {
    pattern: Regex,
    admins: HashSet<u64>,
}

impl LinkDetector {
    pub fn new(admins: HashSet<u64>) -> Result<Self, ModerationError> {
        let pattern =
            Regex::new(LINK_PATTERN).map_err(|e| ModerationError::ConfigError(e.to_string()))?;
        Ok(Self { pattern, admins })
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admins.contains(&user_id)
    }

    pub fn contains_link(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Classify one message.
    ///
    /// Private chats, unknown chat kinds and textless messages are `Ignored`;
    /// admins are `Exempt` whatever they post.
    pub fn classify(&self, text: Option<&str>, sender_id: u64, chat: ChatKind) -> Classification {
        if !chat.is_multi_member() {
            return Classification::Ignored;
        }

        let text = match text {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Classification::Ignored,
        };

        if self.is_admin(sender_id) {
            return Classification::Exempt;
        }

        if self.contains_link(text) {
            Classification::Violation
        } else {
            Classification::Clean
        }
    }
}
