//! User account command handlers

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_user_add(
    config: &Config,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let user = state
        .auth_service
        .register(username, email, password, password)
        .await?;

    println!("✓ Created user {} (ID: {})", user.username, user.id);
    Ok(())
}

pub async fn cmd_user_list(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let users = state.user_service.list_users().await?;

    if users.is_empty() {
        println!("No users registered.");
        println!();
        println!("Add one with: microblog user add <username> <email> --password <password>");
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let counts = state.follow_graph.counts(user.id).await?;
        println!("• {} <{}>", user.username, user.email);
        println!(
            "  ID: {} | Followers: {} | Following: {} | Last seen: {}",
            user.id,
            counts.followers,
            counts.following,
            user.last_seen.as_deref().unwrap_or("never")
        );
    }

    Ok(())
}
