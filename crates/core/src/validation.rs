//! Input validators shared by the HTTP layer.

use crate::error::CoreError;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 32;
pub const MAX_EVENT_TYPE_LEN: usize = 64;
pub const MAX_SLUG_LEN: usize = 80;

/// Validate a username: 3..=32 ASCII alphanumerics, `_`, `.` or `-`.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "username must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(CoreError::Validation(
            "username may only contain letters, digits, '_', '.' and '-'".into(),
        ));
    }
    Ok(())
}

/// Canonical form used for email uniqueness and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a client event name such as `lesson.video_played`.
///
/// Lowercase ASCII segments of `[a-z0-9_]` separated by single dots, starting
/// with a letter.
pub fn validate_event_type(event_type: &str) -> Result<(), CoreError> {
    let invalid = || {
        CoreError::Validation(format!(
            "event type '{event_type}' must be lowercase dot-separated words of at most \
             {MAX_EVENT_TYPE_LEN} characters"
        ))
    };

    if event_type.is_empty() || event_type.len() > MAX_EVENT_TYPE_LEN {
        return Err(invalid());
    }
    if !event_type.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(invalid());
    }
    for segment in event_type.split('.') {
        if segment.is_empty()
            || !segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(invalid());
        }
    }
    Ok(())
}

/// Validate a course slug: lowercase ASCII words joined by single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    let well_formed = !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug
            .split('-')
            .all(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    if !well_formed {
        return Err(CoreError::Validation(format!(
            "slug '{slug}' must be lowercase words joined by '-' (at most {MAX_SLUG_LEN} characters)"
        )));
    }
    Ok(())
}

/// Trim a required free-text field and reject it when blank.
pub fn require_text(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(validate_username("anna_k").is_ok());
        assert!(validate_username("a.b-c").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("анна").is_err());
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Anna@Example.COM "), "anna@example.com");
    }

    #[test]
    fn event_types() {
        assert!(validate_event_type("page_view").is_ok());
        assert!(validate_event_type("lesson.video_played").is_ok());
        assert!(validate_event_type("").is_err());
        assert!(validate_event_type("Lesson.view").is_err());
        assert!(validate_event_type("lesson..view").is_err());
        assert!(validate_event_type("lesson.view.").is_err());
        assert!(validate_event_type("1lesson").is_err());
        assert!(validate_event_type(&"a".repeat(65)).is_err());
    }

    #[test]
    fn slugs() {
        assert!(validate_slug("ai-foundations").is_ok());
        assert!(validate_slug("course2").is_ok());
        assert!(validate_slug("AI").is_err());
        assert!(validate_slug("-lead").is_err());
        assert!(validate_slug("double--dash").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn required_text_is_trimmed() {
        assert_eq!(require_text("title", "  Intro ").unwrap(), "Intro");
        assert!(require_text("title", "   ").is_err());
    }
}
