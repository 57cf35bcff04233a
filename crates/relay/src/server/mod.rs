mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    dingtalk::{DingTalkClient, DingTalkNotifier},
    Result,
};

pub struct Server {
    notifier: DingTalkNotifier,
}

impl Server {
    pub fn new(config: &Config) -> Self {
        Self {
            notifier: DingTalkNotifier::new(config.dingtalk.clone(), DingTalkClient::new()),
        }
    }

    pub fn build_router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route("/health", get(routes::health))
            .route("/metrics", get(routes::metrics))
            .route("/node/{ddkey}", post(routes::relay_alerts))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub async fn start(self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.build_router()).await?;
        Ok(())
    }
}
