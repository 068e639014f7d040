use std::sync::Arc;

use crate::{
    config::Config,
    storage::{CornerStore, MemoryStore},
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn CornerStore>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let config = Config::load();

        // the relational store is wired in by the deployment; the demo
        // server runs on the seeded fixture set
        Arc::new(Self {
            config,
            store: Arc::new(MemoryStore::seeded()),
            http: reqwest::Client::new(),
        })
    }
}
