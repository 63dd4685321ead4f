//! Shareable link tokens.
//!
//! Tokens are short, URL-safe, and collision-sparse; the store's unique
//! constraint on `link` is the authority when a collision does happen.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of a generated link token.
pub const TOKEN_LEN: usize = 8;

/// Generate a random alphanumeric link token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Compose the full shareable link from the request's base URL and a token.
pub fn compose_link(base_url: &str, token: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_collision_sparse() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_compose_link() {
        assert_eq!(
            compose_link("http://example.com", "abc12345"),
            "http://example.com/abc12345"
        );
        // A trailing slash on the base URL must not double up.
        assert_eq!(
            compose_link("http://example.com/", "abc12345"),
            "http://example.com/abc12345"
        );
    }
}
