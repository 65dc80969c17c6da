//! Credential validation.
//!
//! Username: non-empty, at most 64 chars. Password: at least 8 chars with
//! one lowercase, one uppercase, one digit and one special from `@$!%*?&`,
//! drawn only from that alphabet.

use super::AuthError;

/// Maximum accepted username length.
const USERNAME_MAX_LEN: usize = 64;

/// Minimum accepted password length.
const PASSWORD_MIN_LEN: usize = 8;

/// Characters accepted as the password's special class.
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Validate a registration/login payload. The error message is generic on
/// purpose; it never echoes the offending value.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() || username.len() > USERNAME_MAX_LEN {
        return Err(AuthError::Validation("Invalid username".into()));
    }
    if !password_meets_policy(password) {
        return Err(AuthError::Validation(
            "Password does not meet requirements".into(),
        ));
    }
    Ok(())
}

fn password_meets_policy(password: &str) -> bool {
    if password.len() < PASSWORD_MIN_LEN {
        return false;
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);
    if !password.chars().all(allowed) {
        return false;
    }
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}
