// Failed login tracking: block a key after too many failures

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::debug;

/// Failed attempt tracking
#[derive(Debug, Clone)]
struct FailedAttempts {
    /// Number of failed attempts
    count: u32,
    /// When the tracking started
    first_attempt: u64,
    /// When the block lifts
    blocked_until: Option<u64>,
}

/// In-memory login throttle keyed by normalized email
pub struct LoginThrottle {
    failed_attempts: Arc<RwLock<HashMap<String, FailedAttempts>>>,
    /// Maximum failed attempts before blocking
    max_failed_attempts: u32,
    /// Block duration in seconds
    block_duration_secs: u64,
}

impl LoginThrottle {
    pub fn new(max_failed_attempts: u32, block_duration_secs: u64) -> Self {
        Self {
            failed_attempts: Arc::new(RwLock::new(HashMap::new())),
            max_failed_attempts,
            block_duration_secs,
        }
    }

    pub async fn record_failed_attempt(&self, key: &str) {
        let mut attempts = self.failed_attempts.write().await;
        let now = current_timestamp();

        let before = attempts.len();
        attempts.retain(|_, entry| !self.is_stale(entry, now));
        if attempts.len() < before {
            debug!("Expired {} stale failed-login entries", before - attempts.len());
        }

        let entry = attempts.entry(key.to_string()).or_insert(FailedAttempts {
            count: 0,
            first_attempt: now,
            blocked_until: None,
        });

        // Start over once the tracking window has passed
        if now.saturating_sub(entry.first_attempt) > self.block_duration_secs {
            entry.count = 0;
            entry.first_attempt = now;
            entry.blocked_until = None;
        }

        entry.count += 1;

        if entry.count >= self.max_failed_attempts {
            entry.blocked_until = Some(now + self.block_duration_secs);
            debug!("Blocking {} after {} failed attempts", key, entry.count);
        }
    }

    /// Seconds until the key may try again, or `None` if it is not blocked
    pub async fn retry_after(&self, key: &str) -> Option<u64> {
        let mut attempts = self.failed_attempts.write().await;
        let now = current_timestamp();

        if let Some(entry) = attempts.get_mut(key)
            && let Some(blocked_until) = entry.blocked_until
        {
            if now < blocked_until {
                return Some((blocked_until - now).max(1));
            }
            // Unblock and reset
            entry.blocked_until = None;
            entry.count = 0;
            entry.first_attempt = now;
        }

        None
    }

    pub async fn reset(&self, key: &str) {
        self.failed_attempts.write().await.remove(key);
    }

    /// Outside the tracking window and not blocked
    fn is_stale(&self, entry: &FailedAttempts, now: u64) -> bool {
        now.saturating_sub(entry.first_attempt) > self.block_duration_secs
            && entry.blocked_until.is_none_or(|until| now >= until)
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
