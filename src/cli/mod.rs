//! CLI module - Command-line interface for Microblog
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Microblog - a small social posting service
#[derive(Parser)]
#[command(name = "microblog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    #[command(alias = "daemon", alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Publish a post as a user
    Post {
        /// Author's username
        username: String,
        /// Post text
        #[arg(required = true)]
        body: Vec<String>,
    },

    /// Make one user follow another
    Follow {
        /// User who follows
        actor: String,
        /// User to be followed
        target: String,
    },

    /// Make one user stop following another
    Unfollow {
        /// User who unfollows
        actor: String,
        /// User to be unfollowed
        target: String,
    },

    /// Show a user's timeline (their posts and those of users they follow)
    #[command(alias = "tl")]
    Timeline {
        username: String,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show posts from every user
    Explore {
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Add {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
    },

    /// List all users
    #[command(alias = "ls")]
    List,
}

/// Page selection shared by feed commands. Pages start at 1.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,

    /// Defaults to `feed.posts_per_page`
    #[arg(long, allow_negative_numbers = true)]
    pub per_page: Option<i64>,
}

pub use commands::*;
