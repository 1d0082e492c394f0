//! Field rules shared by registration, profile editing and posting.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::post::MAX_POST_LENGTH;

pub const MAX_USERNAME_LENGTH: usize = 64;
pub const MAX_EMAIL_LENGTH: usize = 120;
pub const MAX_ABOUT_ME_LENGTH: usize = 140;

pub fn validate_username(username: &str) -> Result<&str, String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err("Username is required".to_string());
    }
    if trimmed.chars().count() > MAX_USERNAME_LENGTH {
        return Err(format!(
            "Username must be {MAX_USERNAME_LENGTH} characters or less"
        ));
    }
    if trimmed.chars().any(char::is_whitespace) || trimmed.contains('/') {
        return Err("Username cannot contain spaces or slashes".to_string());
    }
    Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<&str, String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex"));

    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err("Email is required".to_string());
    }
    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(format!("Email must be {MAX_EMAIL_LENGTH} characters or less"));
    }
    if !re.is_match(trimmed) {
        return Err("Invalid email address".to_string());
    }
    Ok(trimmed)
}

/// Checks a new password and its confirmation.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password != confirm {
        return Err("Passwords must match".to_string());
    }
    Ok(())
}

pub fn validate_about_me(about_me: &str) -> Result<Option<&str>, String> {
    let trimmed = about_me.trim();
    if trimmed.chars().count() > MAX_ABOUT_ME_LENGTH {
        return Err(format!(
            "About me must be {MAX_ABOUT_ME_LENGTH} characters or less"
        ));
    }
    Ok((!trimmed.is_empty()).then_some(trimmed))
}

pub fn validate_post_body(body: &str) -> Result<&str, String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err("Post cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_POST_LENGTH {
        return Err(format!("Post must be {MAX_POST_LENGTH} characters or less"));
    }
    Ok(trimmed)
}
