use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix timestamp in seconds.
///
/// A clock set before the epoch reads as `0`, which makes every stored
/// expiry look live rather than panicking on the request path.
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Generate a UUID-based opaque token
pub fn generate_uuid_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Expiry `duration_secs` after `now`
pub fn calculate_expiry(now: u64, duration_secs: u64) -> u64 {
    now.saturating_add(duration_secs)
}

/// An expiry is reached at its own instant, not one second later.
pub fn is_expired(expires_at: u64, now: u64) -> bool {
    now >= expires_at
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp() {
        let ts = get_timestamp();
        assert!(ts > 0);
    }

    #[test]
    fn test_uuid_token() {
        let token1 = generate_uuid_token();
        let token2 = generate_uuid_token();
        assert_ne!(token1, token2);
        assert_eq!(token1.len(), 36);
    }

    #[test]
    fn test_expiry() {
        let now = 1_000;
        let future = calculate_expiry(now, 3600);
        assert_eq!(future, 4_600);
        assert!(!is_expired(future, now));
        assert!(!is_expired(future, future - 1));
        assert!(is_expired(future, future));
        assert!(is_expired(future, future + 1));
    }

    #[test]
    fn test_expiry_saturates() {
        assert_eq!(calculate_expiry(u64::MAX - 1, 10), u64::MAX);
    }
}
