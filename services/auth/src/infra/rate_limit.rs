use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use dashmap::DashMap;
use deadpool_redis::Pool;
use deadpool_redis::redis::Script;

use crate::domain::repository::IssueRateLimiter;
use crate::domain::types::{RATE_LIMIT_MAX_ATTEMPTS, RATE_LIMIT_WINDOW, RateDecision};
use crate::error::AuthServiceError;

// ── In-memory backend ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: u32,
    last_allowed: Instant,
}

/// Process-local limiter. The window restarts from the last allowed
/// attempt; rejected attempts do not extend it.
///
/// At most `max_entries` identifiers are tracked. When full, entries whose
/// window has elapsed are dropped first, then the stalest one.
pub struct MemoryRateLimiter {
    entries: DashMap<String, Entry>,
    max_attempts: u32,
    window: Duration,
    max_entries: usize,
}

impl MemoryRateLimiter {
    pub fn new(max_entries: usize) -> Self {
        Self::with_policy(RATE_LIMIT_MAX_ATTEMPTS, RATE_LIMIT_WINDOW, max_entries)
    }

    pub fn with_policy(max_attempts: u32, window: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_attempts,
            window,
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check and record an attempt for `key` at `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        // Evict before taking the entry guard: retain/iter lock every shard.
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            self.evict(now);
        }

        let mut entry = self.entries.entry(key.to_owned()).or_insert(Entry {
            count: 0,
            last_allowed: now,
        });
        let elapsed = now.saturating_duration_since(entry.last_allowed);

        if entry.count == 0 || elapsed > self.window {
            entry.count = 1;
            entry.last_allowed = now;
            return RateDecision::Allowed;
        }
        if entry.count >= self.max_attempts {
            return RateDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }
        entry.count += 1;
        entry.last_allowed = now;
        RateDecision::Allowed
    }

    fn evict(&self, now: Instant) {
        let window = self.window;
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.last_allowed) <= window);
        if self.entries.len() < self.max_entries {
            return;
        }
        let stalest = self
            .entries
            .iter()
            .min_by_key(|e| e.value().last_allowed)
            .map(|e| e.key().clone());
        if let Some(key) = stalest {
            self.entries.remove(&key);
        }
    }
}

impl IssueRateLimiter for MemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateDecision, AuthServiceError> {
        Ok(self.check_at(key, Instant::now()))
    }
}

// ── Redis backend ────────────────────────────────────────────────────────────

/// KEYS[1] = counter key, ARGV[1] = max attempts, ARGV[2] = window in ms.
/// Returns {1, count} when allowed, {0, remaining_ms} when limited.
const CHECK_SCRIPT: &str = r#"
local current = tonumber(redis.call('GET', KEYS[1]) or '0')
if current >= tonumber(ARGV[1]) then
  return {0, redis.call('PTTL', KEYS[1])}
end
local n = redis.call('INCR', KEYS[1])
redis.call('PEXPIRE', KEYS[1], ARGV[2])
return {1, n}
"#;

/// Limiter shared by every auth instance. One script call per check keeps
/// the increment-or-reset atomic.
#[derive(Clone)]
pub struct RedisRateLimiter {
    pool: Pool,
    script: Arc<Script>,
    max_attempts: u32,
    window: Duration,
}

impl RedisRateLimiter {
    pub fn new(pool: Pool) -> Self {
        Self::with_limits(pool, RATE_LIMIT_MAX_ATTEMPTS, RATE_LIMIT_WINDOW)
    }

    pub fn with_limits(pool: Pool, max_attempts: u32, window: Duration) -> Self {
        Self {
            pool,
            script: Arc::new(Script::new(CHECK_SCRIPT)),
            max_attempts,
            window,
        }
    }
}

fn redis_key(key: &str) -> String {
    format!("otp_issue:{key}")
}

impl IssueRateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str) -> Result<RateDecision, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("get redis connection")?;
        let (allowed, value): (i64, i64) = self
            .script
            .key(redis_key(key))
            .arg(self.max_attempts)
            .arg(self.window.as_millis() as u64)
            .invoke_async(&mut conn)
            .await
            .context("run rate limit script")?;

        if allowed == 1 {
            Ok(RateDecision::Allowed)
        } else {
            // PTTL is negative when the key vanished between GET and PTTL.
            let remaining = u64::try_from(value).unwrap_or(0);
            Ok(RateDecision::Limited {
                retry_after: Duration::from_millis(remaining),
            })
        }
    }
}

// ── Runtime selection ────────────────────────────────────────────────────────

/// Backend chosen by `RATE_LIMIT_BACKEND`.
#[derive(Clone)]
pub enum RateLimiter {
    Memory(Arc<MemoryRateLimiter>),
    Redis(RedisRateLimiter),
}

impl IssueRateLimiter for RateLimiter {
    async fn check(&self, key: &str) -> Result<RateDecision, AuthServiceError> {
        match self {
            Self::Memory(limiter) => limiter.check(key).await,
            Self::Redis(limiter) => limiter.check(key).await,
        }
    }
}
