// Discord layer - commands, event handlers and the platform adapter.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "moderation/mod.rs"]
pub mod moderation;

use crate::core::moderation::LinkGuardService;
use crate::infra::moderation::InMemoryViolationStore;
use self::moderation::DiscordModerationActions;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// The link guard as wired for Discord.
pub type LinkGuard = LinkGuardService<InMemoryViolationStore, DiscordModerationActions>;

/// Shared state handed to every command and event.
pub struct Data {
    pub link_guard: LinkGuard,
    pub delete_link_messages: bool,
}
