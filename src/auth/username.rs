use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum username length, in characters.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Letters, digits and `@ . + - _`.
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

/// Check a proposed username, returning a user-facing message on failure.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.is_empty() {
        return Err("This field is required.");
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err("Ensure this value has at most 150 characters.");
    }
    if !USERNAME_RE.is_match(username) {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("NoName").is_ok());
        assert!(validate_username("author_another").is_ok());
        assert!(validate_username("a.b+c-d@e").is_ok());
        assert!(validate_username("Лев").is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("slash/name").is_err());
        assert!(validate_username(&"x".repeat(151)).is_err());
    }
}
