use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo::User;

/// Request body for account creation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Request body for self-update. PUT semantics: names are always replaced
/// with these values; an omitted password keeps the stored one.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_has_no_password_key() {
        let response = UserResponse {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            first_name: Some("Jane".into()),
            last_name: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("a@b.com"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn update_request_password_is_optional() {
        let body: UpdateUserRequest = serde_json::from_str(
            r#"{"email":"a@b.com","first_name":"Jane","last_name":"Doe"}"#,
        )
        .unwrap();
        assert!(body.password.is_none());
        assert_eq!(body.first_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn create_request_needs_only_email_and_password() {
        let body: CreateUserRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"Str0ngPass"}"#).unwrap();
        assert_eq!(body.email, "a@b.com");
        assert!(body.first_name.is_none());
        assert!(body.last_name.is_none());
    }
}
