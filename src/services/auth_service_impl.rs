//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{MailConfig, SecurityConfig};
use crate::db::{Store, UniqueViolation};
use crate::domain::{TokenError, TokenSigner, UserId};
use crate::models::User;
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::mailer::{Mailer, reset_password_email};
use crate::services::validation;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    mail: MailConfig,
    signer: TokenSigner,
    mailer: Arc<dyn Mailer>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(
        store: Store,
        security: SecurityConfig,
        mail: MailConfig,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let signer = TokenSigner::new(
            security.secret_key.as_bytes().to_vec(),
            security.reset_token_ttl_seconds,
        );
        Self {
            store,
            security,
            mail,
            signer,
            mailer,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        password2: &str,
    ) -> Result<User, AuthError> {
        let username = validation::validate_username(username).map_err(AuthError::Validation)?;
        let email = validation::validate_email(email).map_err(AuthError::Validation)?;
        validation::validate_new_password(password, password2).map_err(AuthError::Validation)?;

        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(AuthError::Conflict(
                "Please use a different username".to_string(),
            ));
        }
        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict(
                "Please use a different email address".to_string(),
            ));
        }

        // The checks above can race with a concurrent registration.
        let user = match self
            .store
            .create_user(username, email, password, &self.security)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                return Err(match UniqueViolation::find(&e) {
                    Some(v) if v.is_on("email") => {
                        AuthError::Conflict("Please use a different email address".to_string())
                    }
                    Some(_) => AuthError::Conflict("Please use a different username".to_string()),
                    None => e.into(),
                });
            }
        };

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .verify_user_password(username.trim(), password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        info!("User {} logged in", user.username);
        Ok(user)
    }

    async fn current_user(&self, id: UserId) -> Result<User, AuthError> {
        self.store
            .get_user(id)
            .await?
            .ok_or(AuthError::Unauthorized)
    }

    async fn touch_last_seen(&self, id: UserId) -> Result<(), AuthError> {
        self.store.touch_last_seen(id).await?;
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let Some(user) = self.store.get_user_by_email(email.trim()).await? else {
            info!("Password reset requested for unknown address");
            return Ok(());
        };

        let token = self.signer.issue_reset(user.id);
        let url = format!("{}/{token}", self.mail.reset_url_base.trim_end_matches('/'));
        let email = reset_password_email(&self.mail.sender, &user.email, &user.username, &url);

        self.mailer.send(email).await?;
        info!("Password reset mail sent to user {}", user.id);
        Ok(())
    }

    async fn reset_password(
        &self,
        token: &str,
        password: &str,
        password2: &str,
    ) -> Result<(), AuthError> {
        let user_id = self.signer.verify_reset(token).inspect_err(|e| {
            if matches!(e, TokenError::BadSignature) {
                warn!("Rejected reset token with a bad signature");
            }
        })?;

        validation::validate_new_password(password, password2).map_err(AuthError::Validation)?;

        // A valid signature for a deleted account is still unusable.
        if self.store.get_user(user_id).await?.is_none() {
            return Err(AuthError::InvalidToken(TokenError::Malformed));
        }

        self.store
            .update_user_password(user_id, password, &self.security)
            .await?;

        info!("Password reset for user {}", user_id);
        Ok(())
    }
}
