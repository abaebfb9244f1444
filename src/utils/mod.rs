//! Utility functions and helpers.

pub mod http;
pub mod log;

/// Mask a secret for display, keeping the last four characters.
pub fn redact(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return "<unset>".to_string();
    }
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

/// Join a base URL and a path segment with exactly one slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact() {
        assert_eq!(redact(""), "<unset>");
        assert_eq!(redact("abc"), "***");
        assert_eq!(redact("secret-key"), "******-key");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://api.example.com/v2/", "/agents/1/launch"),
            "https://api.example.com/v2/agents/1/launch"
        );
        assert_eq!(join_url("http://x", "y"), "http://x/y");
    }
}
