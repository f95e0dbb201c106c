use super::*;

/// Claim names the authenticator owns. A claims provider cannot set these.
pub const RESERVED: [&str; 9] = [
    "id", "exp", "orig_iat", "iss", "sub", "aud", "nbf", "iat", "jti",
];

/// JWT payload.
///
/// `id`, `exp` and `orig_iat` are typed; everything else rides along in
/// `extra` and is flattened into the same JSON object on the wire.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    id: String,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    orig_iat: Option<i64>,
    #[serde(flatten)]
    extra: Extra,
}

impl Claims {
    /// Claims for a fresh login at `now`.
    ///
    /// Provider entries are merged first and reserved names always win:
    /// colliding entries are dropped with a warning.
    pub fn issue(id: impl Into<String>, extra: Extra, now: i64, timeout: i64, refreshable: bool) -> Self {
        let id = id.into();
        let extra = extra
            .into_iter()
            .filter(|(key, _)| {
                let reserved = RESERVED.contains(&key.as_str());
                if reserved {
                    log::warn!("claims provider set reserved claim {:?} for {}, dropping it", key, id);
                }
                !reserved
            })
            .collect();
        Self {
            id,
            exp: now.saturating_add(timeout),
            orig_iat: refreshable.then_some(now),
            extra,
        }
    }
    /// Successor claims for a refresh at `now`. Everything is carried over
    /// verbatim except `exp`; `orig_iat` keeps the original login instant.
    pub fn renew(&self, now: i64, timeout: i64) -> Self {
        Self {
            exp: now.saturating_add(timeout),
            ..self.clone()
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn exp(&self) -> i64 {
        self.exp
    }
    pub fn orig_iat(&self) -> Option<i64> {
        self.orig_iat
    }
    pub fn extra(&self) -> &Extra {
        &self.extra
    }
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
    /// A token is only valid while `exp` is strictly in the future.
    pub fn expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
    /// Wire view: extra claims with the reserved ones merged on top.
    pub fn to_map(&self) -> Extra {
        let mut map = self.extra.clone();
        map.insert("id".to_owned(), Value::from(self.id.as_str()));
        map.insert("exp".to_owned(), Value::from(self.exp));
        if let Some(orig_iat) = self.orig_iat {
            map.insert("orig_iat".to_owned(), Value::from(orig_iat));
        }
        map
    }
}
