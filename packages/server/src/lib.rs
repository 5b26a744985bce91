#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

pub mod error;
pub mod pull_request;
pub mod state;
pub mod statistics;
pub mod team;
pub mod users;

use actix_web::{App, HttpServer, middleware, web};
use error::ApiError;
use state::AppState;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seed for reviewer selection. `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub const fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            rng_seed: None,
        }
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    #[must_use]
    pub const fn with_rng_seed(mut self, seed: Option<u64>) -> Self {
        self.rng_seed = seed;
        self
    }
}

/// Register every route on an actix app or test service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/team")
            .route("/add", web::post().to(team::add))
            .route("/get", web::get().to(team::get))
            .route("/deactivate", web::post().to(team::deactivate)),
    )
    .service(
        web::scope("/users")
            .route("/setIsActive", web::post().to(users::set_is_active))
            .route("/getReview", web::get().to(users::get_review)),
    )
    .service(
        web::scope("/pullRequest")
            .route("/create", web::post().to(pull_request::create))
            .route("/merge", web::post().to(pull_request::merge))
            .route("/reassign", web::post().to(pull_request::reassign)),
    )
    .service(
        web::scope("/statistics")
            .route("/team", web::get().to(statistics::team))
            .route("/team/users", web::get().to(statistics::team_users)),
    )
    .route("/health", web::get().to(|| async { "OK" }));
}

/// # Errors
///
/// Returns an error if the server fails to bind or run
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let RunServerResponse { join_handle, .. } = run_server_with_handle(&config)?;

    join_handle.await?
}

pub struct RunServerResponse {
    pub handle: actix_web::dev::ServerHandle,
    pub addrs: Vec<std::net::SocketAddr>,
    pub join_handle: JoinHandle<Result<(), std::io::Error>>,
}

/// # Errors
///
/// Returns an error if the server fails to bind
pub fn run_server_with_handle(config: &ServerConfig) -> std::io::Result<RunServerResponse> {
    log::info!(
        "Starting review server on {}:{}{}",
        config.host,
        config.port,
        config
            .rng_seed
            .map(|seed| format!(" (rng seed {seed})"))
            .unwrap_or_default()
    );

    let state = web::Data::new(AppState::in_memory(config.rng_seed));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?;

    let addrs = server.addrs();
    let server = server.run();
    let handle = server.handle();

    let join_handle = tokio::spawn(server);

    Ok(RunServerResponse {
        handle,
        addrs,
        join_handle,
    })
}
