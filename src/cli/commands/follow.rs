use crate::config::Config;
use crate::services::UserError;
use crate::state::SharedState;

pub async fn cmd_follow(config: &Config, actor: &str, target: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let (actor, target) = resolve_pair(&state, actor, target).await?;

    if state.follow_graph.follow(actor.id, target.id).await? {
        println!("✓ {} is now following {}", actor.username, target.username);
    } else {
        println!("{} already follows {}", actor.username, target.username);
    }
    Ok(())
}

pub async fn cmd_unfollow(config: &Config, actor: &str, target: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let (actor, target) = resolve_pair(&state, actor, target).await?;

    if state.follow_graph.unfollow(actor.id, target.id).await? {
        println!("✓ {} is no longer following {}", actor.username, target.username);
    } else {
        println!("{} was not following {}", actor.username, target.username);
    }
    Ok(())
}

async fn resolve_pair(
    state: &SharedState,
    actor: &str,
    target: &str,
) -> Result<(crate::models::User, crate::models::User), UserError> {
    let actor = state.user_service.get_by_username(actor).await?;
    let target = state.user_service.get_by_username(target).await?;
    Ok((actor, target))
}
