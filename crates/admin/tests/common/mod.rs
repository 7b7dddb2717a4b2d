//! Common test utilities for integration tests.
//!
//! Builds fixture-backed state and gateway doubles with scripted latency.

// Allow dead code in this module - these are helper utilities that may not be used
// by all integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use domain::models::Application;
use domain::resource::{DeleteResponse, ListPage, ListQuery, Resource};
use domain::services::{ApplicationGateway, ChangeEvent, GatewayResult, ResourceGateway};
use persistence::{FixtureGateway, FixtureSet, LatencyConfig};
use tokio::sync::broadcast;
use uni360_admin::{
    app::{create_app, AppState},
    config::Config,
    controller::ResourceListController,
    logging::init_test_logging,
};

/// Create a test configuration with latency disabled.
pub fn test_config() -> Config {
    init_test_logging();
    Config::load_for_test(&[]).expect("Failed to load test config")
}

/// Create a test configuration with default latency enabled.
pub fn test_config_with_latency() -> Config {
    init_test_logging();
    Config::load_for_test(&[("latency.enabled", "true")]).expect("Failed to load test config")
}

pub fn create_test_app(config: Config) -> AppState {
    create_app(config).expect("Failed to seed fixtures")
}

/// The three built-in applications with statuses submitted, under_review
/// and admitted.
pub fn three_applications() -> Vec<Application> {
    FixtureSet::load()
        .expect("Failed to load fixtures")
        .applications
        .into_iter()
        .filter(|a| a.id <= 3)
        .collect()
}

/// Gateway whose `list` latency depends on the requested filter, so tests
/// can make responses resolve out of order.
pub struct DelayedGateway<R: Resource> {
    inner: FixtureGateway<R>,
    delay: Box<dyn Fn(&R::Filter) -> Duration + Send + Sync>,
}

impl<R: Resource> DelayedGateway<R> {
    pub fn new<F>(records: Vec<R>, delay: F) -> Self
    where
        F: Fn(&R::Filter) -> Duration + Send + Sync + 'static,
    {
        Self {
            inner: FixtureGateway::seeded(records, LatencyConfig::disabled()),
            delay: Box::new(delay),
        }
    }
}

#[async_trait::async_trait]
impl<R: Resource> ResourceGateway<R> for DelayedGateway<R> {
    async fn list(&self, query: ListQuery<R::Filter>) -> GatewayResult<ListPage<R>> {
        tokio::time::sleep((self.delay)(&query.filter)).await;
        self.inner.list(query).await
    }

    async fn get(&self, id: i64) -> GatewayResult<R> {
        self.inner.get(id).await
    }

    async fn create(&self, draft: R::Draft) -> GatewayResult<R> {
        self.inner.create(draft).await
    }

    async fn update(&self, id: i64, patch: R::Patch) -> GatewayResult<R> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: i64) -> GatewayResult<DeleteResponse> {
        self.inner.delete(id).await
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.inner.subscribe()
    }
}

impl ApplicationGateway for DelayedGateway<Application> {}

/// Controller over a [`DelayedGateway`] with the test pagination settings.
pub fn delayed_controller<R, F>(
    records: Vec<R>,
    delay: F,
) -> ResourceListController<R, DelayedGateway<R>>
where
    R: Resource,
    F: Fn(&R::Filter) -> Duration + Send + Sync + 'static,
{
    let config = test_config();
    ResourceListController::new(
        Arc::new(DelayedGateway::new(records, delay)),
        &config.pagination,
    )
}
