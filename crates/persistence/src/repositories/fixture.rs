//! Fixture-backed gateway for any resource type.

use chrono::{NaiveDate, Utc};
use domain::resource::{DeleteResponse, ListPage, ListQuery, Resource};
use domain::services::{ChangeEvent, GatewayError, GatewayResult, ResourceGateway};
use tokio::sync::broadcast;
use tracing::debug;

use crate::latency::{LatencyConfig, Operation};
use crate::metrics::GatewayTimer;
use crate::store::FixtureStore;

/// Gateway over a [`FixtureStore`] with simulated network latency.
pub struct FixtureGateway<R: Resource> {
    store: FixtureStore<R>,
    latency: LatencyConfig,
}

impl<R: Resource> Clone for FixtureGateway<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            latency: self.latency.clone(),
        }
    }
}

impl<R: Resource> FixtureGateway<R> {
    pub fn new(store: FixtureStore<R>, latency: LatencyConfig) -> Self {
        Self { store, latency }
    }

    /// Gateway over a fresh store holding `records`.
    pub fn seeded(records: Vec<R>, latency: LatencyConfig) -> Self {
        Self::new(FixtureStore::new(records), latency)
    }

    /// Returns a reference to the backing store.
    pub fn store(&self) -> &FixtureStore<R> {
        &self.store
    }

    pub fn latency(&self) -> &LatencyConfig {
        &self.latency
    }

    /// Starts the timer and waits out the simulated latency.
    pub(crate) async fn begin(&self, operation: Operation) -> GatewayTimer {
        let timer = GatewayTimer::new(R::NAME, operation);
        self.latency.simulate(operation).await;
        timer
    }
}

/// Current calendar date used for stamps on new and updated records.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[async_trait::async_trait]
impl<R: Resource> ResourceGateway<R> for FixtureGateway<R> {
    async fn list(&self, query: ListQuery<R::Filter>) -> GatewayResult<ListPage<R>> {
        let timer = self.begin(Operation::List).await;
        let page = self.store.query(&query).await;
        timer.record();

        debug!(
            resource = R::NAME,
            page = page.page.current_page,
            returned = page.items.len(),
            total = page.page.total,
            "Listed records"
        );
        Ok(page)
    }

    async fn get(&self, id: i64) -> GatewayResult<R> {
        let timer = self.begin(Operation::Get).await;
        let record = self.store.get(id).await;
        timer.record();

        record.ok_or_else(|| GatewayError::not_found::<R>(id))
    }

    async fn create(&self, draft: R::Draft) -> GatewayResult<R> {
        let timer = self.begin(Operation::Create).await;
        let today = today();
        let record = self
            .store
            .insert_with(|id| R::from_draft(id, draft, today))
            .await;
        timer.record();

        debug!(resource = R::NAME, id = record.id(), "Created record");
        Ok(record)
    }

    async fn update(&self, id: i64, patch: R::Patch) -> GatewayResult<R> {
        let timer = self.begin(Operation::Update).await;
        let today = today();
        let updated = self
            .store
            .update_with(id, |record| record.apply_patch(patch, today))
            .await;
        timer.record();

        let record = updated.ok_or_else(|| GatewayError::not_found::<R>(id))?;
        debug!(resource = R::NAME, id, "Updated record");
        Ok(record)
    }

    async fn delete(&self, id: i64) -> GatewayResult<DeleteResponse> {
        let timer = self.begin(Operation::Delete).await;
        let removed = self.store.remove(id).await;
        timer.record();

        removed.ok_or_else(|| GatewayError::not_found::<R>(id))?;
        debug!(resource = R::NAME, id, "Deleted record");
        Ok(DeleteResponse { success: true })
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.store.subscribe()
    }
}
