// Link guard slash commands.
//
// Read-and-clear only: thresholds and the admin set come from the environment
// at startup and cannot be changed from Discord.

use crate::core::moderation::{format_duration, ViolationKey};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Only members of the configured admin set may use these commands.
async fn is_link_admin(ctx: Context<'_>) -> Result<bool, Error> {
    let allowed = ctx.data().link_guard.is_admin(ctx.author().id.get());
    if !allowed {
        ctx.say("❌ Only link guard administrators can use this command.")
            .await?;
    }
    Ok(allowed)
}

/// Link guard commands.
///
/// Inspect or clear link violation records.
#[poise::command(
    slash_command,
    subcommands("status", "warnings", "pardon"),
    guild_only
)]
pub async fn linkguard(_ctx: Context<'_>) -> Result<(), Error> {
    // Parent command - shows help
    Ok(())
}

/// Show the active thresholds.
#[poise::command(slash_command, guild_only, check = "is_link_admin")]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let guard = &ctx.data().link_guard;
    let thresholds = guard.thresholds();

    let embed = serenity::CreateEmbed::new()
        .title("🛡️ Link Guard Status")
        .color(0x00FF00)
        .field(
            "Escalation",
            format!(
                "{} warnings → {} mute → ban",
                thresholds.warn_limit,
                format_duration(thresholds.mute_duration())
            ),
            false,
        )
        .field(
            "Pending reprieve checks",
            guard.pending_reprieves().to_string(),
            true,
        )
        .field(
            "Delete offending messages",
            if ctx.data().delete_link_messages {
                "Yes"
            } else {
                "No"
            },
            true,
        );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show how many link warnings a user has.
#[poise::command(slash_command, guild_only, check = "is_link_admin")]
pub async fn warnings(
    ctx: Context<'_>,
    #[description = "User to look up"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let guard = &ctx.data().link_guard;
    let key = ViolationKey::new(guild_id.get(), user.id.get());

    let count = guard.warn_count(key).await?;
    let limit = guard.thresholds().warn_limit;
    let muted = if guard.has_pending_reprieve(key) {
        " (muted, reprieve pending)"
    } else {
        ""
    };

    ctx.say(format!(
        "<@{}> has {}/{} link warnings{}.",
        user.id, count, limit, muted
    ))
    .await?;
    Ok(())
}

/// Clear a user's link warnings.
#[poise::command(slash_command, guild_only, check = "is_link_admin")]
pub async fn pardon(
    ctx: Context<'_>,
    #[description = "User to pardon"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let key = ViolationKey::new(guild_id.get(), user.id.get());

    if ctx.data().link_guard.pardon(key).await? {
        ctx.say(format!("✅ Cleared all link warnings for <@{}>.", user.id))
            .await?;
    } else {
        ctx.say(format!("<@{}> has no link warnings.", user.id))
            .await?;
    }
    Ok(())
}
