//! Shared test helpers, available to all `#[cfg(test)]` modules in the crate.

use super::*;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

pub const HOUR: i64 = 60 * 60;
pub const SECRET: &[u8] = b"an hmac secret of thirty-two bytes";

pub fn clock(now: i64) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(now))
}

/// Builder with realm "test zone", [`SECRET`], one hour timeout and a
/// single `admin`/`admin` account.
pub fn builder(clock: Arc<ManualClock>) -> Builder {
    TokenAuthenticator::builder()
        .realm("test zone")
        .key(SECRET)
        .timeout(Duration::from_secs(HOUR as u64))
        .authenticator(|user: &str, pass: &str| user == "admin" && pass == "admin")
        .clock(clock)
}

/// Authenticator at t=0 with the given refresh window in seconds.
pub fn authenticator(max_refresh: i64) -> (TokenAuthenticator, Arc<ManualClock>) {
    let clock = clock(0);
    let auth = builder(clock.clone())
        .max_refresh(Duration::from_secs(max_refresh as u64))
        .build()
        .unwrap();
    (auth, clock)
}

/// Token store that remembers every call.
#[derive(Default)]
pub struct RecordingStore {
    pub stored: Mutex<Vec<(String, String, u64)>>,
    pub removed: Mutex<Vec<(String, String)>>,
}

impl TokenStore for RecordingStore {
    fn store(&self, id: &str, token: &str, ttl: Duration) {
        self.stored
            .lock()
            .unwrap()
            .push((id.to_string(), token.to_string(), ttl.as_secs()));
    }
    fn remove(&self, id: &str, token: &str) {
        self.removed
            .lock()
            .unwrap()
            .push((id.to_string(), token.to_string()));
    }
}
