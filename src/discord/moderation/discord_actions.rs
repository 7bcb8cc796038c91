// Discord implementation of the core's outbound moderation port.
//
// "Mute" maps onto a member timeout and "ban" onto a guild ban. Errors are
// handed back to the core, which logs them and keeps its counters as they are.

use crate::core::moderation::{ModerationActions, ModerationError};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Duration;

const BAN_REASON: &str = "Repeated link posting";

pub struct DiscordModerationActions {
    http: Arc<serenity::Http>,
}

impl DiscordModerationActions {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ModerationActions for DiscordModerationActions {
    async fn send_message(&self, channel_id: u64, text: &str) -> Result<(), ModerationError> {
        serenity::ChannelId::new(channel_id)
            .say(&self.http, text)
            .await
            .map(|_| ())
            .map_err(|e| ModerationError::ActionFailed(e.to_string()))
    }

    async fn mute(
        &self,
        chat_id: u64,
        user_id: u64,
        duration: Duration,
    ) -> Result<(), ModerationError> {
        let until_secs = i64::try_from(duration.as_secs())
            .ok()
            .and_then(|secs| chrono::Utc::now().timestamp().checked_add(secs))
            .ok_or_else(|| {
                ModerationError::ActionFailed(format!("mute of {:?} is out of range", duration))
            })?;

        let timeout_until = serenity::Timestamp::from_unix_timestamp(until_secs)
            .map_err(|e| ModerationError::ActionFailed(format!("bad timeout timestamp: {}", e)))?;

        serenity::GuildId::new(chat_id)
            .edit_member(
                &self.http,
                serenity::UserId::new(user_id),
                serenity::EditMember::new().disable_communication_until_datetime(timeout_until),
            )
            .await
            .map(|_| ())
            .map_err(|e| ModerationError::ActionFailed(e.to_string()))
    }

    async fn ban(&self, chat_id: u64, user_id: u64) -> Result<(), ModerationError> {
        serenity::GuildId::new(chat_id)
            .ban_with_reason(&self.http, serenity::UserId::new(user_id), 0, BAN_REASON)
            .await
            .map_err(|e| ModerationError::ActionFailed(e.to_string()))
    }
}
