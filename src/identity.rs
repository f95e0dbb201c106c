use super::*;
use actix_web::FromRequest;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::web;
use futures::future::Ready;
use futures::future::ready;

/// Subject bound to an admitted request.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    claims: Claims,
    token: String,
}

impl Identity {
    pub fn new(claims: Claims, token: String) -> Self {
        Self { claims, token }
    }
    pub fn id(&self) -> &str {
        self.claims.id()
    }
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// String-keyed request context, filled under the keys named in
/// [`Settings`] for downstream code that looks values up by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Env(Extra);

impl Env {
    pub fn new(identity: &Identity, settings: &Settings) -> Self {
        let mut env = Extra::new();
        env.insert(settings.identity_key.clone(), Value::from(identity.id()));
        env.insert(settings.claims_key.clone(), Value::from(identity.claims().to_map()));
        env.insert(settings.token_key.clone(), Value::from(identity.token()));
        Self(env)
    }
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Claims of the admitted request, or an empty map outside the gate.
pub fn extract_claims(request: &HttpRequest) -> Extra {
    request
        .extensions()
        .get::<Identity>()
        .map(|identity| identity.claims().to_map())
        .unwrap_or_default()
}

/// Extractor for authenticated requests.
///
/// Behind [`Gate`] this reads the identity the gate bound. Elsewhere it runs
/// the same admission itself, using the [`TokenAuthenticator`] registered as
/// app data.
pub struct Auth(pub Identity);

impl Auth {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
    pub fn id(&self) -> &str {
        self.0.id()
    }
    pub fn claims(&self) -> &Claims {
        self.0.claims()
    }
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(identity) = req.extensions().get::<Identity>().cloned() {
            return ready(Ok(Auth(identity)));
        }
        let Some(auth) = req.app_data::<web::Data<TokenAuthenticator>>() else {
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "token authenticator not configured",
            )));
        };
        ready(match auth.admit(req) {
            Ok(identity) => {
                req.extensions_mut().insert(identity.clone());
                Ok(Auth(identity))
            }
            Err(e) => {
                let response = auth.reject(&e);
                Err(InternalError::from_response(e, response).into())
            }
        })
    }
}

/// Extractor that yields `None` instead of rejecting when the request
/// carries no acceptable token.
pub struct MaybeAuth(pub Option<Identity>);

impl MaybeAuth {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|identity| identity.id())
    }
}

impl FromRequest for MaybeAuth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        match Auth::from_request(req, payload).into_inner() {
            Ok(Auth(identity)) => ready(Ok(MaybeAuth(Some(identity)))),
            Err(_) => ready(Ok(MaybeAuth(None))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use actix_web::App;
    use actix_web::HttpResponse;
    use actix_web::test::TestRequest;
    use actix_web::test::call_and_read_body;
    use actix_web::test::call_service;
    use actix_web::test::init_service;

    async fn whoami(auth: Auth) -> HttpResponse {
        HttpResponse::Ok().body(auth.id().to_owned())
    }

    async fn maybe(auth: MaybeAuth) -> HttpResponse {
        HttpResponse::Ok().body(auth.id().unwrap_or("anonymous").to_owned())
    }

    #[test]
    fn env_uses_configured_keys() {
        let (auth, _) = authenticator(0);
        let token = auth.login("admin", "admin").unwrap();
        let identity = Identity::new(token.claims().clone(), token.to_string());
        let env = Env::new(&identity, auth.settings());
        assert_eq!(env.get("REMOTE_USER"), Some(&Value::from("admin")));
        assert_eq!(env.get("AUTH_TOKEN"), Some(&Value::from(token.as_str())));
        let payload = env.get("JWT_PAYLOAD").and_then(Value::as_map).unwrap();
        assert_eq!(payload.get("exp"), Some(&Value::from(HOUR)));
    }

    #[test]
    fn claims_empty_outside_gate() {
        let request = TestRequest::default().to_http_request();
        assert!(extract_claims(&request).is_empty());
    }

    #[actix_web::test]
    async fn extractor_without_gate() {
        let (auth, _) = authenticator(0);
        let token = auth.login("admin", "admin").unwrap();
        let app = init_service(
            App::new()
                .app_data(web::Data::new(auth))
                .route("/me", web::get().to(whoami))
                .route("/maybe", web::get().to(maybe)),
        )
        .await;

        let req = TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body = call_and_read_body(&app, req).await;
        assert_eq!(body, "admin");

        let req = TestRequest::get().uri("/me").to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        assert!(res.headers().contains_key("www-authenticate"));

        let req = TestRequest::get().uri("/maybe").to_request();
        let body = call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous");
    }
}
