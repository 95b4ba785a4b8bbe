mod handlers;

use std::net::SocketAddr;

use axum::{
    extract::Extension,
    routing::{get, post, put},
    Router,
};

use crate::api::DynAPI;
use crate::server::handlers::{drivers, rides};

pub async fn serve(api: DynAPI, addr: SocketAddr) {
    let app = Router::new()
        .route("/rides", post(rides::create).get(rides::search))
        .route("/rides/:id", get(rides::find).put(rides::update_schedule))
        .route("/rides/:id/accept", put(rides::accept))
        .route("/rides/:id/book", post(rides::book))
        .route("/rides/:id/respond", post(rides::respond))
        .route("/rides/:id/cancel", put(rides::cancel))
        .route("/rides/:id/complete", put(rides::complete))
        .route("/rides/:id/payment", put(rides::record_payment))
        .route("/drivers", post(drivers::create))
        .route("/drivers/:id", get(drivers::find))
        .route("/drivers/:id/rate", put(drivers::rate))
        .layer(Extension(api));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
        .unwrap();
}
