use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::web;

/// `POST {"username", "password"}` → `{"token"}` via the login emitter.
/// An unreadable body is treated like bad credentials.
pub async fn login(
    auth: web::Data<TokenAuthenticator>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let credentials = match serde_json::from_slice::<LoginRequest>(&body) {
        Ok(credentials) => credentials,
        Err(e) => return auth.reject(&AuthError::Malformed(e.to_string())),
    };
    match auth.login(&credentials.username, &credentials.password) {
        Ok(token) => auth.emit_login(&token, &req),
        Err(e) => auth.reject(&e),
    }
}

/// Exchanges the presented token for a fresh one via the refresh emitter.
/// Runs the full admission (authorizer included) before refreshing, so it
/// is safe with or without [`Gate`] in front.
pub async fn refresh(auth: web::Data<TokenAuthenticator>, req: HttpRequest) -> HttpResponse {
    match auth
        .admit(&req)
        .and_then(|identity| auth.refresh(identity.token()))
    {
        Ok(token) => auth.emit_refresh(&token, &req),
        Err(e) => auth.reject(&e),
    }
}
