// Discord-specific link handling - feeds guild messages into the link guard.

use crate::core::moderation::{ChatKind, InboundMessage};
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

/// Strip a serenity message down to what the core needs.
///
/// Guild channels are group chats and moderated per guild; anything else is a
/// private conversation keyed by its channel.
pub fn to_inbound(msg: &serenity::Message) -> InboundMessage {
    let (chat_id, chat_kind) = match msg.guild_id {
        Some(guild_id) => (guild_id.get(), ChatKind::Group),
        None => (msg.channel_id.get(), ChatKind::Private),
    };

    let text = if msg.content.is_empty() {
        None
    } else {
        Some(msg.content.clone())
    };

    InboundMessage {
        chat_id,
        channel_id: msg.channel_id.get(),
        chat_kind,
        user_id: msg.author.id.get(),
        username: Some(msg.author.name.clone()),
        text,
    }
}

/// Run a message through the link guard.
///
/// Returns `true` if the message was a violation.
pub async fn handle_message_for_links(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<bool, Error> {
    // Skip bots and webhooks
    if msg.author.bot || msg.webhook_id.is_some() {
        return Ok(false);
    }

    let outcome = data.link_guard.on_message(&to_inbound(msg)).await?;

    if !outcome.is_violation() {
        return Ok(false);
    }

    if let Some(action) = &outcome.action {
        tracing::debug!(message_id = msg.id.get(), %action, "Link guard enforced");
    }

    if data.delete_link_messages {
        if let Err(e) = msg.delete(&ctx.http).await {
            tracing::warn!("Failed to delete link message: {}", e);
        }
    }

    Ok(true)
}
