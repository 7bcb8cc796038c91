use crate::discord::{Context, Error};

/// Check that the bot is alive.
#[poise::command(slash_command)]
pub async fn start(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Viper Mode Activated ⚡").await?;
    Ok(())
}
