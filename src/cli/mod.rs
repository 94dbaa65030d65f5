pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{PostId, UserId};

#[derive(Parser)]
#[command(name = "murmur")]
#[command(about = "A terminal client for a small social blog", long_about = None)]
pub struct Cli {
    /// Config file to read instead of ~/.config/murmur/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL from the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Keep the session in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show whether a session is stored
    Status,
    /// List the feed
    Feed,
    /// Like or unlike a post
    Like { post_id: PostId },
    /// Follow or unfollow the author of a post
    Follow { post_id: PostId },
    /// Comment on a post
    Comment {
        post_id: PostId,
        /// Comment text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Show a user's profile
    Profile { user_id: UserId },
}
