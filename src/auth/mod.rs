pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::Deserialize;
use validator::Validate;

pub use extractors::Principal;
pub use middleware::AuthMiddleware;
pub use token::{Claims, TokenCodec, TokenError};

lazy_static! {
    // Usernames: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Payload for a user login request.
///
/// The constraints mirror registration, so a credential that could
/// never have been registered is rejected before the store is asked.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        length(min = 3, max = 32, message = "Username must be between 3 and 32 characters"),
        regex(
            path = "USERNAME_REGEX",
            message = "Username may only contain letters, numbers, underscores and hyphens"
        )
    )]
    pub username: String,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    pub password: String,
}

/// Payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username. Must be between 3 and 32 characters,
    /// alphanumeric plus underscores or hyphens.
    #[validate(
        length(min = 3, max = 32, message = "Username must be between 3 and 32 characters"),
        regex(
            path = "USERNAME_REGEX",
            message = "Username may only contain letters, numbers, underscores and hyphens"
        )
    )]
    pub username: String,
    /// Password for the new account. Must be between 6 and 100
    /// characters; only its hash is ever stored.
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn register(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn register_request_validation() {
        assert!(register("test_user-123", "password123").validate().is_ok());

        // Contains a space and an exclamation mark.
        assert!(register("test user!", "password123").validate().is_err());
        assert!(register("tu", "password123").validate().is_err());
        assert!(register(&"u".repeat(33), "password123").validate().is_err());

        assert!(register("test_user", "12345").validate().is_err());
        assert!(register("test_user", &"p".repeat(101)).validate().is_err());
    }

    #[test]
    fn login_request_validation() {
        let valid = LoginRequest {
            username: "test_user".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_password = LoginRequest {
            username: "test_user".to_string(),
            password: "123".to_string(),
        };
        assert!(short_password.validate().is_err());
    }
}
