//! One-time passcodes for admin login
//!
//! One pending code per lowercased email. Issuing overwrites the pending code,
//! verification is a compare-and-delete: a code works once, an expired entry
//! is removed when it is found, and a wrong code leaves the entry in place.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use common::cache::RedisPool;
use rand::Rng;
use redis::Script;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_OTP_TTL_SECONDS: u64 = 5 * 60;

const REDIS_KEY_PREFIX: &str = "admin_otp:";

/// Atomic compare-and-delete. Returns 0 missing, 1 ok, 2 mismatch, 3 expired.
const VERIFY_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
  return 0
end
local entry = cjson.decode(raw)
if tonumber(ARGV[2]) > tonumber(entry.expires_at) then
  redis.call('DEL', KEYS[1])
  return 3
end
if entry.otp ~= ARGV[1] then
  return 2
end
redis.call('DEL', KEYS[1])
return 1
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpEntry {
    pub otp: String,
    /// Unix seconds
    pub expires_at: i64,
    /// Unix seconds
    pub last_sent_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    Verified,
    NotFound,
    Expired,
    Mismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpBackend {
    Memory,
    Redis,
}

#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub backend: OtpBackend,
    pub ttl_seconds: u64,
}

impl OtpConfig {
    /// # Environment Variables
    /// - `OTP_STORE`: `memory` or `redis` (default: memory)
    /// - `OTP_TTL_SECONDS`: code lifetime (default: 300)
    pub fn from_env() -> Result<Self> {
        let backend = match std::env::var("OTP_STORE")
            .unwrap_or_else(|_| "memory".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => OtpBackend::Memory,
            "redis" => OtpBackend::Redis,
            other => bail!("Unsupported OTP_STORE: {other}"),
        };

        let ttl_seconds = std::env::var("OTP_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|ttl| *ttl > 0)
            .unwrap_or(DEFAULT_OTP_TTL_SECONDS);

        Ok(Self {
            backend,
            ttl_seconds,
        })
    }
}

#[derive(Clone)]
enum Backend {
    /// Single process; one lock serializes every operation
    Memory(Arc<Mutex<HashMap<String, OtpEntry>>>),
    /// Shared between instances with native key expiry
    Redis(RedisPool),
}

#[derive(Clone)]
pub struct OtpStore {
    backend: Backend,
    ttl_seconds: u64,
}

impl OtpStore {
    pub fn in_memory(ttl_seconds: u64) -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(HashMap::new()))),
            ttl_seconds,
        }
    }

    pub fn redis(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            backend: Backend::Redis(pool),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Store a fresh code for `email`, replacing any pending one
    pub async fn issue(&self, email: &str, now: DateTime<Utc>) -> Result<String> {
        let otp = generate_otp();
        let entry = OtpEntry {
            otp: otp.clone(),
            expires_at: now.timestamp() + self.ttl_seconds as i64,
            last_sent_at: now.timestamp(),
        };

        match &self.backend {
            Backend::Memory(entries) => {
                let mut entries = entries.lock().await;
                entries.retain(|_, pending| pending.expires_at >= now.timestamp());
                entries.insert(email.to_string(), entry);
            }
            Backend::Redis(pool) => {
                let value = serde_json::to_string(&entry)?;
                pool.set_with_ttl(&redis_key(email), &value, self.ttl_seconds)
                    .await?;
            }
        }

        debug!(email = %email, "OTP issued");
        Ok(otp)
    }

    pub async fn verify(&self, email: &str, otp: &str, now: DateTime<Utc>) -> Result<OtpCheck> {
        match &self.backend {
            Backend::Memory(entries) => {
                let mut entries = entries.lock().await;
                let check = match entries.get(email) {
                    None => OtpCheck::NotFound,
                    Some(entry) if now.timestamp() > entry.expires_at => OtpCheck::Expired,
                    Some(entry) if entry.otp != otp => OtpCheck::Mismatch,
                    Some(_) => OtpCheck::Verified,
                };
                if matches!(check, OtpCheck::Expired | OtpCheck::Verified) {
                    entries.remove(email);
                }
                Ok(check)
            }
            Backend::Redis(pool) => {
                static SCRIPT: OnceLock<Script> = OnceLock::new();
                let script = SCRIPT.get_or_init(|| Script::new(VERIFY_SCRIPT));

                let now = now.timestamp().to_string();
                let code: i64 = pool
                    .invoke_script(script, &redis_key(email), &[otp, now.as_str()])
                    .await?;

                match code {
                    0 => Ok(OtpCheck::NotFound),
                    1 => Ok(OtpCheck::Verified),
                    2 => Ok(OtpCheck::Mismatch),
                    3 => Ok(OtpCheck::Expired),
                    other => bail!("Unexpected OTP script result: {other}"),
                }
            }
        }
    }

    #[cfg(test)]
    async fn pending(&self) -> usize {
        match &self.backend {
            Backend::Memory(entries) => entries.lock().await.len(),
            Backend::Redis(_) => 0,
        }
    }
}

/// Generate a 6-digit code
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

fn redis_key(email: &str) -> String {
    format!("{REDIS_KEY_PREFIX}{email}")
}
