//! Stateless JWT authentication for actix-web.
//!
//! Issues HMAC-signed tokens at login, guards routes with a bearer-token
//! gate, and renews tokens inside a refresh window anchored at the original
//! login.
//!
//! ## Lifecycle
//!
//! - [`TokenAuthenticator`]: login, verification and refresh
//! - [`Claims`]: token payload with typed `id`, `exp` and `orig_iat`
//! - [`Crypto`]: signing and verification pinned to one [`Algorithm`]
//!
//! ## actix-web
//!
//! - [`Gate`]: middleware admitting only requests with a valid token
//! - [`Auth`] / [`MaybeAuth`]: extractors for the admitted [`Identity`]
//! - [`login`] / [`refresh`]: ready-made handlers
//!
//! ## Collaborators
//!
//! Credential checks, authorization, extra claims, token persistence,
//! extraction and response shape are supplied by the application through the
//! traits in [`hooks`]. Every failure is logged by kind and answered with
//! the same `401` and `WWW-Authenticate: JWT realm="..."` challenge.
mod algorithm;
mod authenticator;
mod claims;
mod clock;
mod config;
mod crypto;
mod dto;
mod error;
mod gate;
mod handlers;
pub mod hooks;
mod identity;
mod value;

pub use algorithm::*;
pub use authenticator::*;
pub use claims::*;
pub use clock::*;
pub use config::*;
pub use crypto::*;
pub use dto::*;
pub use error::*;
pub use gate::*;
pub use handlers::*;
pub use hooks::*;
pub use identity::*;
pub use value::*;

#[cfg(test)]
mod testutil;
