// This module handles bot presence and lifecycle events.
//
// Discord-layer glue only: we work with Discord SDK types (Context,
// ActivityData, OnlineStatus) and keep the logic short.

use poise::serenity_prelude as serenity;

/// Let members know links are being watched.
pub fn set_watching(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching("for links");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

/// Called once the bot is ready so the default presence lives in one place.
pub fn on_ready(ctx: &serenity::Context) {
    set_watching(ctx);
}
