use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::basic::decode_basic;
use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::dto::{CreateUserRequest, UpdateUserRequest};
use crate::users::repo::{is_unique_violation, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Minimum length plus at least one non-alphabetic character. The threshold
/// comes from config, not from here.
pub(crate) fn is_valid_password(password: &str, min_len: usize) -> bool {
    password.len() >= min_len && password.chars().any(|c| !c.is_alphabetic())
}

/// Create an account. All validation happens before any write; the email
/// unique constraint settles concurrent creates for the same address.
pub async fn create_user(state: &AppState, mut input: CreateUserRequest) -> Result<User, ApiError> {
    input.email = input.email.trim().to_lowercase();

    if User::find_by_email(&state.db, &input.email).await?.is_some() {
        warn!(email = %input.email, "email already registered");
        return Err(ApiError::UserAlreadyExists);
    }
    if !is_valid_email(&input.email) {
        warn!(email = %input.email, "invalid email");
        return Err(ApiError::InvalidEmail);
    }
    if !is_valid_password(&input.password, state.config.password_min_len) {
        warn!("password fails policy");
        return Err(ApiError::InvalidPassword);
    }

    let hash = hash_password(&input.password)?;

    let user = User::insert(
        &state.db,
        &input.email,
        &hash,
        input.first_name.as_deref(),
        input.last_name.as_deref(),
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            // Lost a concurrent create for the same email.
            warn!(email = %input.email, "create raced, email taken");
            ApiError::UserAlreadyExists
        } else {
            ApiError::from(e)
        }
    })?;

    info!(user_id = %user.id, "user created");
    Ok(user)
}

/// Self-update. Email identifies the resource and is immutable; names are
/// fully replaced; a provided password is re-validated and re-hashed.
pub async fn update_user(
    state: &AppState,
    authenticated: &User,
    input: UpdateUserRequest,
) -> Result<User, ApiError> {
    if input.email.trim().to_lowercase() != authenticated.email {
        warn!(user_id = %authenticated.id, "update email mismatch");
        return Err(ApiError::EmailMismatch);
    }

    let new_hash = match &input.password {
        Some(password) => {
            if !is_valid_password(password, state.config.password_min_len) {
                warn!(user_id = %authenticated.id, "update password fails policy");
                return Err(ApiError::InvalidPassword);
            }
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = User::update(
        &state.db,
        authenticated.id,
        input.first_name.as_deref(),
        input.last_name.as_deref(),
        new_hash.as_deref(),
    )
    .await?;

    info!(user_id = %user.id, "user updated");
    Ok(user)
}

/// Verify a Basic credential header against the store. Every failure cause
/// collapses to the same Unauthorized so responses cannot be used to probe
/// which emails have accounts.
pub async fn authenticate(state: &AppState, header: Option<&str>) -> Result<User, ApiError> {
    let header = header.ok_or_else(|| {
        warn!("missing Authorization header");
        ApiError::Unauthorized
    })?;

    let (email, password) = decode_basic(header).map_err(|e| {
        warn!(reason = ?e, "malformed credential header");
        ApiError::Unauthorized
    })?;
    let email = email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &email).await? {
        Some(user) => user,
        None => {
            warn!("credentials for unknown email");
            return Err(ApiError::Unauthorized);
        }
    };

    if !verify_password(&password, &user.password_hash) {
        warn!(user_id = %user.id, "credential verification failed");
        return Err(ApiError::Unauthorized);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_requires_at_and_domain_dot() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));

        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a@b.com "));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn password_policy_enforces_length_and_non_alpha() {
        assert!(is_valid_password("Str0ngPass", 8));
        assert!(is_valid_password("pass-word", 8));

        assert!(!is_valid_password("sh0rt", 8));
        assert!(!is_valid_password("allalphabetic", 8));
        assert!(!is_valid_password("", 8));
    }

    #[test]
    fn password_threshold_is_parameterized() {
        assert!(is_valid_password("abc1", 4));
        assert!(!is_valid_password("abc1", 5));
    }
}
