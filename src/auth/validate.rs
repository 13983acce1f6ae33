//! Input checks for account fields.

/// 3 to 30 characters of ASCII letters, digits, `_` or `-`. Usernames become
/// media folder names, so nothing else is allowed.
pub fn is_valid_username(username: &str) -> bool {
    (3..=30).contains(&username.len())
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A deliberately loose shape check: one `@`, non-empty local part, a dot in
/// the domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(is_valid_username("alice_01"));
        assert!(is_valid_username("a-b"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("slash/name"));
        assert!(!is_valid_username(&"x".repeat(31)));
    }

    #[test]
    fn emails() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.org"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@localhost"));
        assert!(!is_valid_email("alice@example..com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("alice @example.com"));
    }
}
