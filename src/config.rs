use super::*;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("realm is required")]
    MissingRealm,
    #[error("signing key is required")]
    MissingKey,
    #[error("authenticator is required")]
    MissingAuthenticator,
    #[error("unknown signing algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Plain settings, fixed at construction.
#[derive(Clone)]
pub struct Settings {
    /// Shown to clients in the `WWW-Authenticate` challenge. Required.
    pub realm: String,
    pub algorithm: Algorithm,
    /// HMAC secret. Required.
    pub key: Vec<u8>,
    /// Lifetime of every issued token. Must be positive: zero is a
    /// configuration error here rather than a fallback to the default hour.
    pub timeout: Duration,
    /// How long after the original login a token may still be refreshed.
    /// Zero disables refresh. A token chain lives at most
    /// `max_refresh + timeout`.
    pub max_refresh: Duration,
    pub header: String,
    pub scheme: String,
    /// Request context key holding the subject id.
    pub identity_key: String,
    /// Request context key holding the full claims map.
    pub claims_key: String,
    /// Request context key holding the raw token string.
    pub token_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            realm: String::new(),
            algorithm: Algorithm::default(),
            key: Vec::new(),
            timeout: Duration::from_secs(60 * 60),
            max_refresh: Duration::ZERO,
            header: "Authorization".to_string(),
            scheme: "Bearer".to_string(),
            identity_key: "REMOTE_USER".to_string(),
            claims_key: "JWT_PAYLOAD".to_string(),
            token_key: "AUTH_TOKEN".to_string(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("realm", &self.realm)
            .field("algorithm", &self.algorithm)
            .field("key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_refresh", &self.max_refresh)
            .field("header", &self.header)
            .field("scheme", &self.scheme)
            .field("identity_key", &self.identity_key)
            .field("claims_key", &self.claims_key)
            .field("token_key", &self.token_key)
            .finish()
    }
}

impl Settings {
    /// Load settings from `JWT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup. Unset variables
    /// keep their defaults; set but unparseable ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seconds = |name: &str| -> Result<Option<Duration>, ConfigError> {
            lookup(name)
                .map(|s| {
                    s.trim()
                        .parse::<u64>()
                        .map(Duration::from_secs)
                        .map_err(|_| ConfigError::Invalid(format!("{name} must be whole seconds")))
                })
                .transpose()
        };
        let mut settings = Self::default();
        if let Some(realm) = lookup("JWT_REALM") {
            settings.realm = realm;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            settings.key = secret.into_bytes();
        }
        if let Some(algorithm) = lookup("JWT_ALGORITHM") {
            settings.algorithm = algorithm.parse()?;
        }
        if let Some(timeout) = seconds("JWT_TIMEOUT_SECS")? {
            settings.timeout = timeout;
        }
        if let Some(max_refresh) = seconds("JWT_MAX_REFRESH_SECS")? {
            settings.max_refresh = max_refresh;
        }
        if let Some(header) = lookup("JWT_HEADER") {
            settings.header = header;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.realm.trim().is_empty() {
            return Err(ConfigError::MissingRealm);
        }
        if self.key.is_empty() {
            return Err(ConfigError::MissingKey);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be positive".to_string()));
        }
        if i64::try_from(self.timeout.as_secs()).is_err() {
            return Err(ConfigError::Invalid("timeout out of range".to_string()));
        }
        if i64::try_from(self.max_refresh.as_secs()).is_err() {
            return Err(ConfigError::Invalid("max_refresh out of range".to_string()));
        }
        if self.header.trim().is_empty() {
            return Err(ConfigError::Invalid("header name cannot be empty".to_string()));
        }
        if self.key.len() < 32 {
            log::warn!(
                "signing key is {} bytes, shorter than the 32 recommended for {}",
                self.key.len(),
                self.algorithm
            );
        }
        Ok(())
    }

    /// Whole seconds as a signed offset, saturating at `i64::MAX`.
    pub(crate) fn seconds(duration: Duration) -> i64 {
        i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
    }

    pub fn refreshable(&self) -> bool {
        !self.max_refresh.is_zero()
    }
}

/// Collects settings and collaborators for a [`TokenAuthenticator`].
#[derive(Default)]
pub struct Builder {
    settings: Settings,
    authenticator: Option<Arc<dyn Authenticator>>,
    authorizer: Option<Arc<dyn Authorizer>>,
    provider: Option<Arc<dyn ClaimsProvider>>,
    store: Option<Arc<dyn TokenStore>>,
    extractor: Option<Arc<dyn TokenExtractor>>,
    login_emitter: Option<Arc<dyn Emitter>>,
    refresh_emitter: Option<Arc<dyn Emitter>>,
    clock: Option<Arc<dyn Clock>>,
}

impl Builder {
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.settings.realm = realm.into();
        self
    }
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.settings.algorithm = algorithm;
        self
    }
    pub fn key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.settings.key = key.into();
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }
    pub fn max_refresh(mut self, max_refresh: Duration) -> Self {
        self.settings.max_refresh = max_refresh;
        self
    }
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.settings.header = header.into();
        self
    }
    pub fn authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }
    pub fn authorizer(mut self, authorizer: impl Authorizer + 'static) -> Self {
        self.authorizer = Some(Arc::new(authorizer));
        self
    }
    pub fn claims_provider(mut self, provider: impl ClaimsProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }
    pub fn extractor(mut self, extractor: impl TokenExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }
    pub fn login_emitter(mut self, emitter: impl Emitter + 'static) -> Self {
        self.login_emitter = Some(Arc::new(emitter));
        self
    }
    pub fn refresh_emitter(mut self, emitter: impl Emitter + 'static) -> Self {
        self.refresh_emitter = Some(Arc::new(emitter));
        self
    }
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<TokenAuthenticator, ConfigError> {
        self.settings.validate()?;
        let authenticator = self.authenticator.ok_or(ConfigError::MissingAuthenticator)?;
        let extractor = self.extractor.unwrap_or_else(|| {
            Arc::new(HeaderExtractor::new(
                self.settings.header.clone(),
                self.settings.scheme.clone(),
            ))
        });
        Ok(TokenAuthenticator {
            crypto: Crypto::new(self.settings.algorithm, &self.settings.key),
            authenticator,
            authorizer: self.authorizer.unwrap_or_else(|| Arc::new(AllowAll)),
            provider: self.provider,
            store: self.store,
            extractor,
            login_emitter: self.login_emitter.unwrap_or_else(|| Arc::new(JsonEmitter)),
            refresh_emitter: self.refresh_emitter.unwrap_or_else(|| Arc::new(JsonEmitter)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            settings: self.settings,
        })
    }
}
