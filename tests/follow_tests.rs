use microblog::config::Config;
use microblog::domain::UserId;
use microblog::services::{FollowError, LogMailer};
use microblog::state::SharedState;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

async fn setup() -> SharedState {
    let db_path = std::env::temp_dir().join(format!("microblog-follow-{}.db", Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}?mode=rwc", db_path.display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    SharedState::with_mailer(config, Arc::new(LogMailer))
        .await
        .expect("Failed to create state")
}

async fn add_user(state: &SharedState, name: &str) -> UserId {
    state
        .auth_service
        .register(name, &format!("{name}@example.com"), "pw", "pw")
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_follow_unfollow_round_trip() {
    let state = setup().await;
    let a = add_user(&state, "a").await;
    let b = add_user(&state, "b").await;
    let graph = &state.follow_graph;

    assert!(!graph.is_following(a, b).await.unwrap());

    assert!(graph.follow(a, b).await.unwrap());
    assert!(graph.is_following(a, b).await.unwrap());
    assert!(!graph.is_following(b, a).await.unwrap());

    assert!(graph.unfollow(a, b).await.unwrap());
    assert!(!graph.is_following(a, b).await.unwrap());
}

#[tokio::test]
async fn test_follow_and_unfollow_are_idempotent() {
    let state = setup().await;
    let a = add_user(&state, "a").await;
    let b = add_user(&state, "b").await;
    let graph = &state.follow_graph;

    assert!(graph.follow(a, b).await.unwrap());
    assert!(!graph.follow(a, b).await.unwrap());
    assert_eq!(graph.counts(b).await.unwrap().followers, 1);

    assert!(graph.unfollow(a, b).await.unwrap());
    assert!(!graph.unfollow(a, b).await.unwrap());
    assert_eq!(graph.counts(b).await.unwrap().followers, 0);
}

#[tokio::test]
async fn test_self_follow_is_rejected_and_graph_unchanged() {
    let state = setup().await;
    let a = add_user(&state, "a").await;
    let graph = &state.follow_graph;

    assert!(matches!(graph.follow(a, a).await, Err(FollowError::SelfFollow)));
    assert!(matches!(graph.unfollow(a, a).await, Err(FollowError::SelfFollow)));
    assert!(!graph.is_following(a, a).await.unwrap());
    assert!(graph.followed_ids(a).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_user_is_not_found() {
    let state = setup().await;
    let a = add_user(&state, "a").await;
    let ghost = UserId::new(4242);
    let graph = &state.follow_graph;

    assert!(matches!(graph.follow(a, ghost).await, Err(FollowError::NotFound(_))));
    assert!(matches!(graph.follow(ghost, a).await, Err(FollowError::NotFound(_))));
    // Existence is checked before the self test.
    assert!(matches!(
        graph.follow(ghost, ghost).await,
        Err(FollowError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_id_sets_and_counts() {
    let state = setup().await;
    let a = add_user(&state, "a").await;
    let b = add_user(&state, "b").await;
    let c = add_user(&state, "c").await;
    let graph = &state.follow_graph;

    graph.follow(a, b).await.unwrap();
    graph.follow(a, c).await.unwrap();
    graph.follow(c, a).await.unwrap();

    assert_eq!(graph.followed_ids(a).await.unwrap(), BTreeSet::from([b, c]));
    assert_eq!(graph.follower_ids(a).await.unwrap(), BTreeSet::from([c]));
    assert!(!graph.followed_ids(a).await.unwrap().contains(&a));

    let counts = graph.counts(a).await.unwrap();
    assert_eq!(counts.followers, 1);
    assert_eq!(counts.following, 2);

    let followers = state.user_service.list_followers("a").await.unwrap();
    let names: Vec<_> = followers.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["c"]);

    let profile = state.user_service.profile(c, "a").await.unwrap();
    assert!(profile.is_following);
    assert_eq!(profile.following, 2);
}
