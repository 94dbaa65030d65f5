use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use murmur::app::AppContext;
use murmur::cli::{commands, Cli, Commands};
use murmur::config::Config;
use murmur::feed::PostAction;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    let ctx = if cli.ephemeral {
        AppContext::ephemeral(config)?
    } else {
        AppContext::new(config)?
    };

    match cli.command {
        Commands::Login { username, password } => {
            commands::login(&ctx, &username, password.as_deref()).await?;
        }
        Commands::Logout => {
            commands::logout(&ctx)?;
        }
        Commands::Status => {
            commands::status(&ctx)?;
        }
        Commands::Feed => {
            commands::list_feed(&ctx).await?;
        }
        Commands::Like { post_id } => {
            commands::act(&ctx, post_id, PostAction::ToggleLike).await?;
        }
        Commands::Follow { post_id } => {
            commands::act(&ctx, post_id, PostAction::ToggleFollow).await?;
        }
        Commands::Comment { post_id, text } => {
            commands::act(&ctx, post_id, PostAction::SubmitComment(text.join(" "))).await?;
        }
        Commands::Profile { user_id } => {
            commands::show_profile(&ctx, user_id).await?;
        }
    }

    Ok(())
}
