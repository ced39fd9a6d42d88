//! Fixed-window rate limit arithmetic.
//!
//! A counter is kept per `(key, window_index)`. The window index is the
//! number of whole windows since the Unix epoch, so every client shares the
//! same window boundaries and a counter never needs resetting, only expiry.

/// `limit` requests per `window_secs` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub scope: &'static str,
    pub limit: i64,
    pub window_secs: i64,
}

/// Reactions: 60 per minute per client.
pub const REACTIONS: RateLimitRule = RateLimitRule {
    scope: "react",
    limit: 60,
    window_secs: 60,
};

/// Newsletter signups: 20 per minute per client.
pub const SUBSCRIBE: RateLimitRule = RateLimitRule {
    scope: "sub",
    limit: 20,
    window_secs: 60,
};

impl RateLimitRule {
    /// Index of the window containing `unix_secs`.
    pub fn window_index(&self, unix_secs: i64) -> i64 {
        unix_secs.div_euclid(self.window_secs)
    }

    /// First second after the window with the given index.
    pub fn window_end(&self, window_index: i64) -> i64 {
        (window_index + 1) * self.window_secs
    }

    /// Counter key for a client under this rule.
    pub fn key(&self, client: &str) -> String {
        format!("{}:{client}", self.scope)
    }

    /// Whether the `hits`-th request in a window is still allowed.
    pub fn allows(&self, hits: i64) -> bool {
        hits <= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_are_aligned_to_the_epoch() {
        assert_eq!(REACTIONS.window_index(0), 0);
        assert_eq!(REACTIONS.window_index(59), 0);
        assert_eq!(REACTIONS.window_index(60), 1);
        assert_eq!(REACTIONS.window_end(1), 120);
    }

    #[test]
    fn limit_is_inclusive() {
        assert!(SUBSCRIBE.allows(20));
        assert!(!SUBSCRIBE.allows(21));
    }

    #[test]
    fn keys_are_scoped() {
        assert_eq!(REACTIONS.key("10.0.0.1"), "react:10.0.0.1");
        assert_eq!(SUBSCRIBE.key("unknown"), "sub:unknown");
    }
}
