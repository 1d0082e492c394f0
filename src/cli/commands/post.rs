use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_post(config: &Config, username: &str, body: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let author = state.user_service.get_by_username(username).await?;
    let post = state.user_service.publish_post(author.id, body).await?;

    println!("✓ Post {} published by {}", post.id, author.username);
    Ok(())
}
