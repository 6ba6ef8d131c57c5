//! Shape checks for signup input
//!
//! Signin never validates shape: any mismatch there is just invalid
//! credentials.

use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use crate::{
    error::{AuthError, AuthResult},
    models::Credentials,
};

const USERNAME_LENGTH: RangeInclusive<usize> = 3..=32;
const PASSWORD_LENGTH: RangeInclusive<usize> = 8..=128;

/// Validate both fields of a signup request
pub fn validate_signup(credentials: &Credentials) -> AuthResult<()> {
    validate_username(&credentials.username)?;
    validate_password(&credentials.password)
}

/// 3 to 32 letters, digits or underscores
pub fn validate_username(username: &str) -> AuthResult<()> {
    check_length("Username", username, USERNAME_LENGTH)?;

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(invalid(
            "Username can only contain letters, numbers, and underscores",
        ));
    }

    Ok(())
}

/// 8 to 128 characters with at least one uppercase letter, one lowercase
/// letter, one digit and one special character
pub fn validate_password(password: &str) -> AuthResult<()> {
    check_length("Password", password, PASSWORD_LENGTH)?;

    let classes: [(fn(&char) -> bool, &str); 4] = [
        (char::is_ascii_uppercase, "an uppercase letter"),
        (char::is_ascii_lowercase, "a lowercase letter"),
        (char::is_ascii_digit, "a digit"),
        (|c: &char| !c.is_alphanumeric(), "a special character"),
    ];

    for (predicate, name) in classes {
        if !password.chars().any(|c| predicate(&c)) {
            return Err(invalid(&format!("Password must contain at least {}", name)));
        }
    }

    Ok(())
}

fn check_length(field: &str, value: &str, range: RangeInclusive<usize>) -> AuthResult<()> {
    let length = value.chars().count();
    if length == 0 {
        return Err(invalid(&format!("{} is required", field)));
    }
    if !range.contains(&length) {
        return Err(invalid(&format!(
            "{} must be between {} and {} characters long",
            field,
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

fn invalid(message: &str) -> AuthError {
    AuthError::InvalidInput(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: AuthResult<()>) -> String {
        match result {
            Err(AuthError::InvalidInput(message)) => message,
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn accepts_reasonable_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob_42").is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert_eq!(message(validate_username("")), "Username is required");
        assert!(validate_username("al").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username("alice@example").is_err());
    }

    #[test]
    fn accepts_strong_passwords() {
        assert!(validate_password("Secret123!").is_ok());
        assert!(validate_password("Other456!").is_ok());
    }

    #[test]
    fn rejects_weak_passwords() {
        assert_eq!(
            message(validate_password("short1!")),
            "Password must be between 8 and 128 characters long"
        );
        assert_eq!(
            message(validate_password("alllowercase1!")),
            "Password must contain at least an uppercase letter"
        );
        assert!(validate_password("ALLUPPERCASE1!").is_err());
        assert!(validate_password("NoDigitsHere!").is_err());
        assert!(validate_password("NoSpecial123").is_err());
    }

    #[test]
    fn signup_checks_both_fields() {
        assert!(validate_signup(&Credentials::new("alice", "Secret123!")).is_ok());
        assert!(validate_signup(&Credentials::new("alice", "weak")).is_err());
        assert!(validate_signup(&Credentials::new("a b", "Secret123!")).is_err());
    }
}
