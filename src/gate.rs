use super::*;
use actix_web::Error;
use actix_web::HttpMessage;
use actix_web::body::EitherBody;
use actix_web::dev::Service;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::dev::Transform;
use actix_web::dev::forward_ready;
use futures::future::LocalBoxFuture;
use futures::future::Ready;
use futures::future::ready;
use std::sync::Arc;

/// Middleware guarding every route it wraps.
///
/// A request moves through extraction, verification, binding and
/// authorization. Passing all of them admits it to the wrapped service with
/// [`Identity`] and [`Env`] in its extensions. Failing any of them answers
/// with the uniform 401 and the wrapped service never runs.
#[derive(Clone)]
pub struct Gate {
    auth: Arc<TokenAuthenticator>,
}

impl Gate {
    pub fn new(auth: Arc<TokenAuthenticator>) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Gate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = GateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GateMiddleware {
            service,
            auth: self.auth.clone(),
        }))
    }
}

pub struct GateMiddleware<S> {
    service: S,
    auth: Arc<TokenAuthenticator>,
}

impl<S, B> Service<ServiceRequest> for GateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.auth.admit(req.request()) {
            Ok(identity) => {
                log::trace!("admitted {} to {}", identity.id(), req.path());
                req.extensions_mut()
                    .insert(Env::new(&identity, self.auth.settings()));
                req.extensions_mut().insert(identity);
                let future = self.service.call(req);
                Box::pin(async move { future.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(e) => {
                let response = self.auth.reject(&e);
                Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
            }
        }
    }
}
