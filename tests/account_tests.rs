use microblog::config::Config;
use microblog::db::UniqueViolation;
use microblog::services::{AuthError, LogMailer};
use microblog::state::SharedState;
use std::sync::Arc;
use uuid::Uuid;

async fn setup() -> SharedState {
    let db_path = std::env::temp_dir().join(format!("microblog-account-{}.db", Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}?mode=rwc", db_path.display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    SharedState::with_mailer(config, Arc::new(LogMailer))
        .await
        .expect("Failed to create state")
}

#[tokio::test]
async fn test_duplicate_insert_reports_violated_column() {
    let state = setup().await;
    let security = state.config.security.clone();

    state
        .store
        .create_user("dup", "dup@example.com", "pw", &security)
        .await
        .unwrap();

    let err = state
        .store
        .create_user("dup", "other@example.com", "pw", &security)
        .await
        .unwrap_err();
    let violation = UniqueViolation::find(&err).expect("unique violation in chain");
    assert!(violation.is_on("username"), "{violation}");

    let err = state
        .store
        .create_user("other", "dup@example.com", "pw", &security)
        .await
        .unwrap_err();
    assert!(UniqueViolation::find(&err).unwrap().is_on("email"));
}

#[tokio::test]
async fn test_profile_rename_onto_taken_username_is_a_violation() {
    let state = setup().await;
    let security = state.config.security.clone();

    state
        .store
        .create_user("alice", "alice@example.com", "pw", &security)
        .await
        .unwrap();
    let bob = state
        .store
        .create_user("bob", "bob@example.com", "pw", &security)
        .await
        .unwrap();

    let err = state
        .store
        .update_user_profile(bob.id, "alice", None)
        .await
        .unwrap_err();
    assert!(UniqueViolation::find(&err).is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_yields_one_conflict() {
    let state = setup().await;

    let mut handles = Vec::new();
    for n in 0..4 {
        let auth = state.auth_service.clone();
        handles.push(tokio::spawn(async move {
            auth.register("dup", &format!("dup{n}@example.com"), "pw", "pw")
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(user) => {
                assert_eq!(user.username, "dup");
                created += 1;
            }
            Err(AuthError::Conflict(msg)) => assert_eq!(msg, "Please use a different username"),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn test_profile_update_conflict() {
    let state = setup().await;
    state
        .auth_service
        .register("alice", "alice@example.com", "pw", "pw")
        .await
        .unwrap();
    let bob = state
        .auth_service
        .register("bob", "bob@example.com", "pw", "pw")
        .await
        .unwrap();

    let result = state.user_service.update_profile(bob.id, "alice", "").await;
    assert!(matches!(
        result,
        Err(microblog::services::UserError::Conflict(_))
    ));
}
