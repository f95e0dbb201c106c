//! Demo Server Binary
//!
//! Serves `/auth/login`, `/auth/refresh` and a gated `/api/hello`.
//! Settings come from `JWT_*` variables, the single account from
//! `DEMO_USER` / `DEMO_PASSWORD`, the bind address from `BIND_ADDR`.

use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use jwt_gate::*;
use std::sync::Arc;

fn log() {
    let config = simplelog::ConfigBuilder::new()
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}

async fn hello(auth: Auth) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "id": auth.id(),
        "claims": auth.claims().to_map(),
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    log();
    let settings = Settings::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let user = std::env::var("DEMO_USER").unwrap_or_else(|_| "admin".to_string());
    let pass = std::env::var("DEMO_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    let auth = TokenAuthenticator::builder()
        .settings(settings)
        .authenticator(move |u: &str, p: &str| u == user && p == pass)
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let auth = Arc::new(auth);
    let data = web::Data::from(auth.clone());
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("starting {} on {}", auth.realm(), addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .app_data(data.clone())
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(login))
                    .service(
                        web::scope("")
                            .wrap(Gate::new(auth.clone()))
                            .route("/refresh", web::get().to(refresh)),
                    ),
            )
            .service(
                web::scope("/api")
                    .wrap(Gate::new(auth.clone()))
                    .route("/hello", web::get().to(hello)),
            )
    })
    .bind(addr)?
    .run()
    .await
}
