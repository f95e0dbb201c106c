use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::http::header;
use std::sync::Arc;

/// Issues, verifies and refreshes signed tokens.
///
/// Holds only read-only configuration and shared collaborators, so one
/// instance serves any number of concurrent requests.
pub struct TokenAuthenticator {
    pub(crate) settings: Settings,
    pub(crate) crypto: Crypto,
    pub(crate) authenticator: Arc<dyn Authenticator>,
    pub(crate) authorizer: Arc<dyn Authorizer>,
    pub(crate) provider: Option<Arc<dyn ClaimsProvider>>,
    pub(crate) store: Option<Arc<dyn TokenStore>>,
    pub(crate) extractor: Arc<dyn TokenExtractor>,
    pub(crate) login_emitter: Arc<dyn Emitter>,
    pub(crate) refresh_emitter: Arc<dyn Emitter>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl TokenAuthenticator {
    pub fn builder() -> Builder {
        Builder::default()
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn realm(&self) -> &str {
        &self.settings.realm
    }
    pub fn algorithm(&self) -> Algorithm {
        self.crypto.algorithm()
    }
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    fn timeout(&self) -> i64 {
        Settings::seconds(self.settings.timeout)
    }

    /// Exchanges credentials for a signed token.
    pub fn login(&self, username: &str, password: &str) -> Result<Token, AuthError> {
        if !self.authenticator.authenticate(username, password) {
            return Err(AuthError::AuthenticationFailed);
        }
        let extra = self
            .provider
            .as_ref()
            .map(|provider| provider.claims(username))
            .unwrap_or_default();
        let claims = Claims::issue(
            username,
            extra,
            self.now(),
            self.timeout(),
            self.settings.refreshable(),
        );
        let token = self.crypto.encode(claims)?;
        if let Some(store) = &self.store {
            store.store(username, token.as_str(), self.settings.timeout);
        }
        log::info!("issued token for {} until {}", username, token.claims().exp());
        Ok(token)
    }

    /// Checks signature, algorithm and expiry of a raw token.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.crypto.decode(token, self.now())
    }

    /// Exchanges a still-valid token for a new one with a later `exp`.
    ///
    /// The refresh window counts from the original login (`orig_iat`), not
    /// from the presented token, so refreshing cannot extend a session past
    /// `orig_iat + max_refresh + timeout`. The presented token is not
    /// revoked here; it stays valid until its own `exp` unless the token
    /// store's removal hook enforces otherwise.
    pub fn refresh(&self, token: &str) -> Result<Token, AuthError> {
        if !self.settings.refreshable() {
            log::warn!("refresh attempted while refresh is disabled");
            return Err(AuthError::RefreshDisabled);
        }
        let now = self.now();
        let claims = self.crypto.decode(token, now)?;
        let orig_iat = claims
            .orig_iat()
            .ok_or_else(|| AuthError::Malformed("orig_iat missing".to_string()))?;
        if orig_iat < now.saturating_sub(Settings::seconds(self.settings.max_refresh)) {
            return Err(AuthError::RefreshWindowExceeded);
        }
        let renewed = self.crypto.encode(claims.renew(now, self.timeout()))?;
        let id = renewed.claims().id();
        if let Some(store) = &self.store {
            store.store(id, renewed.as_str(), self.settings.timeout);
            store.remove(id, token);
        }
        log::info!("refreshed token for {} until {}", id, renewed.claims().exp());
        Ok(renewed)
    }

    pub fn extract(&self, request: &HttpRequest) -> Result<String, AuthError> {
        self.extractor.extract(request)
    }

    pub fn authorize(&self, id: &str, request: &HttpRequest) -> Result<(), AuthError> {
        match self.authorizer.authorize(id, request) {
            true => Ok(()),
            false => Err(AuthError::AuthorizationDenied),
        }
    }

    /// Request gate: extract, verify, bind, authorize.
    ///
    /// Any failure short-circuits; the caller turns it into the uniform
    /// rejection with [`TokenAuthenticator::reject`].
    pub fn admit(&self, request: &HttpRequest) -> Result<Identity, AuthError> {
        let token = self.extract(request)?;
        let claims = self.verify(&token)?;
        let identity = Identity::new(claims, token);
        self.authorize(identity.id(), request)?;
        Ok(identity)
    }

    pub fn emit_login(&self, token: &Token, request: &HttpRequest) -> HttpResponse {
        self.login_emitter.emit(token.as_str(), request)
    }

    pub fn emit_refresh(&self, token: &Token, request: &HttpRequest) -> HttpResponse {
        self.refresh_emitter.emit(token.as_str(), request)
    }

    /// `WWW-Authenticate` challenge value.
    pub fn challenge(&self) -> String {
        format!("JWT realm=\"{}\"", self.settings.realm)
    }

    /// The one response every failed request gets.
    pub fn unauthorized(&self) -> HttpResponse {
        HttpResponse::Unauthorized()
            .insert_header((header::WWW_AUTHENTICATE, self.challenge()))
            .json(ErrorResponse {
                error: "Not Authorized".to_string(),
            })
    }

    /// Logs why a request failed and answers with [`Self::unauthorized`].
    pub fn reject(&self, error: &AuthError) -> HttpResponse {
        log::debug!("rejected request ({}): {}", error.kind(), error);
        self.unauthorized()
    }
}
