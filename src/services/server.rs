use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::StartGgClient;
use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::cache::Cache;
use crate::config::settings::AppConfig;
use crate::fetchers::PlayerFinder;
use crate::reconcile::{PairScheduler, Reconciler, RecordStore};
use crate::roster::RosterStore;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let client = Arc::new(StartGgClient::new(&self.config.api)?);
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&client),
            self.config.reconcile.clone(),
        ));
        let scheduler = Arc::new(PairScheduler::new(
            Arc::clone(&reconciler),
            RecordStore::new(),
            &self.config.reconcile,
        ));
        let finder = Arc::new(PlayerFinder::new(Arc::clone(&client))?);
        let roster = Arc::new(RosterStore::open(Cache::new("cache")?)?);

        let state = Arc::new(AppState::new(
            self.config.clone(),
            client,
            roster,
            reconciler,
            scheduler,
            finder,
        ));

        // Warm the matrix for the persisted roster
        state.spawn_refresh();

        let app = create_router(state).layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
