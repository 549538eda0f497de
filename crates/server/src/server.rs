use axum::{
    Router,
    middleware,
    routing::get,
};
use sea_orm::DatabaseConnection;

use std::sync::Arc;

use crate::{cards, categories, envelope, expenses, health, reports};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route("/cards", get(cards::list).post(cards::create))
        .route(
            "/cards/{id}",
            get(cards::get).put(cards::update).delete(cards::remove),
        )
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::remove),
        )
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::remove),
        )
        .route("/reports/monthly", get(reports::monthly))
        .route("/reports/yearly", get(reports::yearly));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health::get))
        .layer(middleware::from_fn(envelope::stamp))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
