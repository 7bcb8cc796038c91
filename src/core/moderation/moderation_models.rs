// Moderation domain models - data structures for the link guard.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer converts platform events into these and back.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Identifies one moderation subject inside one chat.
///
/// The same user in two different chats is two different subjects.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct ViolationKey {
    pub chat_id: u64,
    pub user_id: u64,
}

impl ViolationKey {
    pub fn new(chat_id: u64, user_id: u64) -> Self {
        Self { chat_id, user_id }
    }
}

impl std::fmt::Display for ViolationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

/// Kind of chat a message arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// A 1:1 conversation with the bot
    Private,
    /// A multi-member chat (a Discord guild channel)
    Group,
    /// Anything the adapter could not map
    #[allow(dead_code)]
    Other,
}

impl ChatKind {
    /// Only multi-member chats are moderated.
    pub fn is_multi_member(&self) -> bool {
        matches!(self, ChatKind::Group)
    }
}

/// One inbound text message, already stripped of platform types.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat_id: u64,
    /// Where replies for this message should be posted.
    pub channel_id: u64,
    pub chat_kind: ChatKind,
    pub user_id: u64,
    pub username: Option<String>,
    pub text: Option<String>,
}

impl InboundMessage {
    pub fn key(&self) -> ViolationKey {
        ViolationKey::new(self.chat_id, self.user_id)
    }
}

/// What the detector decided about a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not a moderated context, or nothing to inspect
    Ignored,
    /// Sender is an administrator
    Exempt,
    /// No link in the text
    Clean,
    /// Link found, sender is subject to enforcement
    Violation,
}

/// Action the escalation engine took for one violation.
#[derive(Debug, Clone, PartialEq)]
pub enum EnforcementAction {
    /// Warned with `remaining` violations left before a mute
    Warn { warn_count: u32, remaining: u32 },
    /// Final warning followed by a mute and a scheduled reprieve check
    Mute { warn_count: u32, duration: Duration },
    /// Removed from the chat; the record is gone
    Ban { warn_count: u32 },
}

impl std::fmt::Display for EnforcementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnforcementAction::Warn {
                warn_count,
                remaining,
            } => write!(f, "warning #{} ({} remaining)", warn_count, remaining),
            EnforcementAction::Mute {
                warn_count,
                duration,
            } => write!(f, "mute for {}s at #{}", duration.as_secs(), warn_count),
            EnforcementAction::Ban { warn_count } => write!(f, "ban at #{}", warn_count),
        }
    }
}

/// Result of a reprieve check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReprieveOutcome {
    /// The subject stayed quiet; their slate is wiped
    Cleared,
    /// The subject violated again while muted
    Banned,
    /// The record was already gone
    NoRecord,
}

/// What happened to one inbound message, end to end.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationOutcome {
    pub classification: Classification,
    pub action: Option<EnforcementAction>,
}

impl ModerationOutcome {
    pub fn passed(classification: Classification) -> Self {
        Self {
            classification,
            action: None,
        }
    }

    pub fn is_violation(&self) -> bool {
        self.classification == Classification::Violation
    }
}

/// Longest mute the platform accepts (Discord caps timeouts at 28 days).
pub const MAX_MUTE_DURATION_SECS: u64 = 28 * 24 * 60 * 60;

/// Thresholds for the warn -> mute -> ban ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementThresholds {
    /// Violations allowed before the mute (the mute lands on this one)
    pub warn_limit: u32,
    /// How long a mute lasts, in seconds
    pub mute_duration_secs: u64,
}

impl EnforcementThresholds {
    pub fn mute_duration(&self) -> Duration {
        Duration::from_secs(self.mute_duration_secs)
    }

    /// The reprieve check runs one second after the mute would expire.
    pub fn reprieve_delay(&self) -> Duration {
        self.mute_duration().saturating_add(Duration::from_secs(1))
    }
}

impl Default for EnforcementThresholds {
    fn default() -> Self {
        Self {
            warn_limit: 3,           // 3 links...
            mute_duration_secs: 600, // ...then a 10 minute mute
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reprieve_delay_never_overflows() {
        let thresholds = EnforcementThresholds {
            warn_limit: 3,
            mute_duration_secs: u64::MAX,
        };
        assert_eq!(thresholds.reprieve_delay(), Duration::MAX);
        assert_eq!(
            EnforcementThresholds::default().reprieve_delay(),
            Duration::from_secs(601)
        );
    }
}

/// Everything the moderation core needs at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Users that are never flagged
    pub admin_ids: HashSet<u64>,
    pub thresholds: EnforcementThresholds,
}
