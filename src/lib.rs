#![allow(clippy::missing_errors_doc)]

use axum::Router;
use axum::routing::{get, post};
use clap::Parser;
use repository::Repository;
use state::SharedState;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tracing::instrument;

pub mod endpoints;
pub mod layers;
pub mod models;
pub mod repository;
pub mod service;
pub mod state;

#[derive(Parser, Clone, Debug)]
#[must_use]
pub struct Settings {
    #[arg(default_value_t = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080))]
    pub socket_addr: SocketAddr,

    #[arg(long, default_value = "sqlite://social_media.db")]
    pub database_url: String,

    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,

    /// Filter directives added to the defaults, e.g. `sqlx=debug`. Ignored when
    /// `RUST_LOG` is set.
    #[arg(long)]
    pub log_filter: Option<String>,

    #[arg(long)]
    pub compact_logs: bool,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/register", post(endpoints::account::register))
        .route("/login", post(endpoints::account::login))
        .route(
            "/messages",
            get(endpoints::message::list).post(endpoints::message::create),
        )
        .route(
            "/messages/{message_id}",
            get(endpoints::message::find)
                .delete(endpoints::message::delete)
                .patch(endpoints::message::update),
        )
        .route(
            "/accounts/{account_id}/messages",
            get(endpoints::message::list_by_account),
        )
        .layer(layers::trace_layer())
        .with_state(state)
}

#[instrument]
pub async fn run(settings: Settings) -> Result<(), color_eyre::eyre::Report> {
    let repository = Repository::connect(&settings.database_url, settings.max_connections).await?;
    let router = self::router(SharedState::new(repository));

    let listener = TcpListener::bind(settings.socket_addr).await?;
    tracing::info!(listen_addr = ?listener.local_addr()?, "Bound to local socket");

    axum::serve(listener, router)
        .with_graceful_shutdown(self::shutdown_signal())
        .await?;

    Ok(())
}

#[instrument]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c()
        .await
        .inspect(|()| tracing::info!("Caught CTRL+C signal, shutting down"))
        .inspect_err(|error| tracing::error!(?error, "Failed to await CTRL+C signal"));
}
