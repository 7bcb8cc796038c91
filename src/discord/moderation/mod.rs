// Discord side of the link guard: event handling, platform actions, commands.

pub mod commands;
pub mod discord_actions;
pub mod link_handler;

pub use discord_actions::DiscordModerationActions;
pub use link_handler::handle_message_for_links;
