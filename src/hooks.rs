//! Capabilities supplied by the embedding application.
//!
//! Each collaborator is a one-method trait (two for [`TokenStore`]). Plain
//! closures implement the single-method ones, so
//! `|user: &str, pass: &str| user == "admin" && pass == "admin"` is a valid
//! [`Authenticator`].
use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::cookie::Cookie;
use std::time::Duration;

/// Verifies a username/password pair.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> bool;
}

/// Post-authentication access check for an admitted identity.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, id: &str, request: &HttpRequest) -> bool;
}

/// Extra claims to embed in a token at login.
pub trait ClaimsProvider: Send + Sync {
    fn claims(&self, id: &str) -> Extra;
}

/// Persistence hooks for issued tokens, for revocation checks kept
/// outside this crate.
pub trait TokenStore: Send + Sync {
    fn store(&self, id: &str, token: &str, ttl: Duration);
    fn remove(&self, id: &str, token: &str);
}

/// Pulls the raw token string out of a request.
pub trait TokenExtractor: Send + Sync {
    fn extract(&self, request: &HttpRequest) -> Result<String, AuthError>;
}

/// Writes a freshly signed token back to the client.
pub trait Emitter: Send + Sync {
    fn emit(&self, token: &str, request: &HttpRequest) -> HttpResponse;
}

impl<F> Authenticator for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn authenticate(&self, username: &str, password: &str) -> bool {
        self(username, password)
    }
}

impl<F> Authorizer for F
where
    F: Fn(&str, &HttpRequest) -> bool + Send + Sync,
{
    fn authorize(&self, id: &str, request: &HttpRequest) -> bool {
        self(id, request)
    }
}

impl<F> ClaimsProvider for F
where
    F: Fn(&str) -> Extra + Send + Sync,
{
    fn claims(&self, id: &str) -> Extra {
        self(id)
    }
}

impl<F> TokenExtractor for F
where
    F: Fn(&HttpRequest) -> Result<String, AuthError> + Send + Sync,
{
    fn extract(&self, request: &HttpRequest) -> Result<String, AuthError> {
        self(request)
    }
}

impl<F> Emitter for F
where
    F: Fn(&str, &HttpRequest) -> HttpResponse + Send + Sync,
{
    fn emit(&self, token: &str, request: &HttpRequest) -> HttpResponse {
        self(token, request)
    }
}

/// Admits every authenticated identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn authorize(&self, _: &str, _: &HttpRequest) -> bool {
        true
    }
}

/// Reads `<scheme> <token>` from a header, `Authorization: Bearer ...` by
/// default. The value must split into exactly two space-separated parts.
#[derive(Debug, Clone)]
pub struct HeaderExtractor {
    name: String,
    scheme: String,
}

impl HeaderExtractor {
    pub fn new(name: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scheme: scheme.into(),
        }
    }
}

impl Default for HeaderExtractor {
    fn default() -> Self {
        Self::new("Authorization", "Bearer")
    }
}

impl TokenExtractor for HeaderExtractor {
    fn extract(&self, request: &HttpRequest) -> Result<String, AuthError> {
        let header = request
            .headers()
            .get(self.name.as_str())
            .ok_or(AuthError::Extraction("auth header missing"))?
            .to_str()
            .map_err(|_| AuthError::Extraction("auth header not ascii"))?;
        if header.is_empty() {
            return Err(AuthError::Extraction("auth header empty"));
        }
        match header.split(' ').collect::<Vec<_>>().as_slice() {
            [scheme, token] if *scheme == self.scheme && !token.is_empty() => {
                Ok(token.to_string())
            }
            _ => Err(AuthError::Extraction("invalid auth header")),
        }
    }
}

/// Reads the token from a cookie, the counterpart of [`CookieEmitter`].
#[derive(Debug, Clone)]
pub struct CookieExtractor {
    name: String,
}

impl CookieExtractor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl TokenExtractor for CookieExtractor {
    fn extract(&self, request: &HttpRequest) -> Result<String, AuthError> {
        request
            .cookie(&self.name)
            .map(|cookie| cookie.value().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::Extraction("auth cookie missing"))
    }
}

/// Responds `200 {"token": "..."}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit(&self, token: &str, _: &HttpRequest) -> HttpResponse {
        HttpResponse::Ok().json(TokenResponse {
            token: token.to_owned(),
        })
    }
}

/// Responds `204` and sets the token as an http-only cookie that lives as
/// long as the token.
#[derive(Debug, Clone)]
pub struct CookieEmitter {
    name: String,
    ttl: Duration,
    secure: bool,
}

impl CookieEmitter {
    pub fn new(name: impl Into<String>, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            ttl,
            secure: true,
        }
    }
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

impl Emitter for CookieEmitter {
    fn emit(&self, token: &str, _: &HttpRequest) -> HttpResponse {
        let cookie = Cookie::build(self.name.clone(), token.to_owned())
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .max_age(actix_web::cookie::time::Duration::seconds(
                Settings::seconds(self.ttl),
            ))
            .finish();
        HttpResponse::NoContent().cookie(cookie).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn bearer(value: &str) -> Result<String, AuthError> {
        let request = TestRequest::default()
            .insert_header(("Authorization", value))
            .to_http_request();
        HeaderExtractor::default().extract(&request)
    }

    #[test]
    fn bearer_header() {
        assert_eq!(bearer("Bearer abc.def.ghi"), Ok("abc.def.ghi".to_owned()));
    }

    #[test]
    fn bad_bearer_headers() {
        assert!(bearer("").is_err());
        assert!(bearer("Bearer").is_err());
        assert!(bearer("Bearer ").is_err());
        assert!(bearer("bearer abc").is_err());
        assert!(bearer("Basic YWRtaW46YWRtaW4=").is_err());
        assert!(bearer("Bearer abc def").is_err());
        assert!(bearer("abc.def.ghi").is_err());
    }

    #[test]
    fn missing_header() {
        let request = TestRequest::default().to_http_request();
        assert_eq!(
            HeaderExtractor::default().extract(&request),
            Err(AuthError::Extraction("auth header missing"))
        );
    }

    #[test]
    fn custom_header() {
        let request = TestRequest::default()
            .insert_header(("X-Auth", "Token abc"))
            .to_http_request();
        let extractor = HeaderExtractor::new("X-Auth", "Token");
        assert_eq!(extractor.extract(&request), Ok("abc".to_owned()));
    }

    #[test]
    fn cookie_extractor() {
        let request = TestRequest::default()
            .cookie(Cookie::new("jwt", "abc"))
            .to_http_request();
        assert_eq!(CookieExtractor::new("jwt").extract(&request), Ok("abc".to_owned()));
        assert!(CookieExtractor::new("other").extract(&request).is_err());
    }

    #[test]
    fn cookie_emitter_sets_cookie() {
        let request = TestRequest::default().to_http_request();
        let response = CookieEmitter::new("jwt", Duration::from_secs(60)).emit("abc", &request);
        assert_eq!(response.status(), actix_web::http::StatusCode::NO_CONTENT);
        let cookie = response.cookies().next().unwrap();
        assert_eq!(cookie.name(), "jwt");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn closures_are_collaborators() {
        let check = |user: &str, pass: &str| user == "admin" && pass == "admin";
        assert!(check.authenticate("admin", "admin"));
        assert!(!check.authenticate("admin", "guess"));
        let request = TestRequest::default().to_http_request();
        assert!(AllowAll.authorize("anyone", &request));
    }
}
