//! Generic resource list controller.
//!
//! A controller owns the filter, pagination and result state of one list
//! view and mediates every intent through its gateway. Each filter or
//! page change goes back to the gateway; nothing is filtered locally.
//!
//! Every load takes a token from a monotonic generation counter. Only the
//! response carrying the latest token is applied, so a slow response to
//! an older request can never overwrite a newer one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use domain::resource::{ListQuery, Resource, ResourceFilter};
use domain::services::{ChangeEvent, ChangeKind, GatewayError, ResourceGateway};
use metrics::counter;
use serde::Serialize;
use shared::pagination::PageRequest;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use validator::Validate;

use super::state::{ListState, ListView, Phase};
use crate::config::PaginationConfig;
use crate::error::AdminError;

/// What became of a requested load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOutcome {
    /// The response was written to state.
    Applied,
    /// A newer request superseded this one, or the controller was detached.
    Discarded,
    /// The list is errored; the change was recorded and waits for a retry.
    Deferred,
}

/// Change subscription with a sticky "something changed" flag.
struct ChangeFeed {
    rx: broadcast::Receiver<ChangeEvent>,
    dirty: bool,
}

impl ChangeFeed {
    fn new(rx: broadcast::Receiver<ChangeEvent>) -> Self {
        Self { rx, dirty: false }
    }

    /// Consumes every pending event. The first event equal to `own` was
    /// caused by this controller and is skipped; anything else, including
    /// a lag, marks the feed dirty.
    fn drain(&mut self, mut own: Option<ChangeEvent>) {
        loop {
            match self.rx.try_recv() {
                Ok(event) if own == Some(event) => own = None,
                Ok(_) => self.dirty = true,
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Change feed lagged");
                    self.dirty = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Stateful list view over one resource type.
pub struct ResourceListController<R, G = dyn ResourceGateway<R>>
where
    R: Resource,
    G: ResourceGateway<R> + ?Sized,
{
    gateway: Arc<G>,
    state: Mutex<ListState<R>>,
    generation: AtomicU64,
    detached: AtomicBool,
    changes: Mutex<ChangeFeed>,
    max_page_size: u32,
}

impl<R, G> ResourceListController<R, G>
where
    R: Resource,
    G: ResourceGateway<R> + ?Sized,
{
    pub fn new(gateway: Arc<G>, pagination: &PaginationConfig) -> Self {
        let rx = gateway.subscribe();
        Self {
            state: Mutex::new(ListState::new(pagination.first_page())),
            generation: AtomicU64::new(0),
            detached: AtomicBool::new(false),
            changes: Mutex::new(ChangeFeed::new(rx)),
            max_page_size: pagination.max_page_size,
            gateway,
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Clone of the full list state.
    pub async fn snapshot(&self) -> ListState<R> {
        self.state.lock().await.clone()
    }

    pub async fn view(&self) -> ListView<R> {
        self.state.lock().await.view()
    }

    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    fn is_current(&self, token: u64) -> bool {
        !self.is_detached() && self.generation.load(Ordering::Acquire) == token
    }

    /// Fetches the current page for the current filters.
    pub async fn load(&self) -> Result<LoadOutcome, AdminError> {
        if self.is_detached() {
            return Ok(LoadOutcome::Discarded);
        }

        let (token, query) = {
            let mut state = self.state.lock().await;
            let token = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            state.begin_load();
            (
                token,
                ListQuery::new(state.filters.clone(), state.page_request()),
            )
        };

        debug!(resource = R::NAME, token, page = query.page.page, "Loading list");
        let result = self.gateway.list(query).await;

        let mut state = self.state.lock().await;
        if !self.is_current(token) {
            debug!(resource = R::NAME, token, "Discarding stale list response");
            counter!("controller_stale_responses_total", "resource" => R::NAME).increment(1);
            return Ok(LoadOutcome::Discarded);
        }

        match result {
            Ok(page) => {
                debug!(
                    resource = R::NAME,
                    token,
                    returned = page.items.len(),
                    total = page.page.total,
                    "List loaded"
                );
                state.apply_page(page);
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                let err = AdminError::from(err);
                warn!(resource = R::NAME, error = %err, "List load failed");
                state.fail(err.clone());
                Err(err)
            }
        }
    }

    pub async fn reload(&self) -> Result<LoadOutcome, AdminError> {
        self.load().await
    }

    /// Leaves the errored phase by loading again.
    pub async fn retry(&self) -> Result<LoadOutcome, AdminError> {
        info!(resource = R::NAME, "Retrying list load");
        self.load().await
    }

    /// Applies `change` to the criteria, then fetches unless errored.
    async fn change_criteria<F>(&self, change: F) -> Result<LoadOutcome, AdminError>
    where
        F: FnOnce(&mut ListState<R>) -> Result<(), AdminError> + Send,
    {
        {
            let mut state = self.state.lock().await;
            change(&mut *state)?;
            if state.phase == Phase::Errored {
                debug!(resource = R::NAME, "List errored, fetch deferred until retry");
                return Ok(LoadOutcome::Deferred);
            }
        }
        self.load().await
    }

    /// Sets one filter field by wire name and returns to page 1.
    pub async fn set_filter(&self, field: &str, value: &str) -> Result<LoadOutcome, AdminError> {
        self.change_criteria(|state| {
            let mut filters = state.filters.clone();
            filters.set_field(field, value)?;
            state.filters = filters;
            state.go_to_page(PageRequest::first(state.pagination.page_size));
            Ok(())
        })
        .await
    }

    /// Replaces every filter criterion at once and returns to page 1.
    pub async fn apply_filter(&self, filter: R::Filter) -> Result<LoadOutcome, AdminError> {
        self.change_criteria(|state| {
            state.filters = filter;
            state.go_to_page(PageRequest::first(state.pagination.page_size));
            Ok(())
        })
        .await
    }

    pub async fn clear_filters(&self) -> Result<LoadOutcome, AdminError> {
        self.apply_filter(R::Filter::default()).await
    }

    pub async fn set_page(&self, page: u32) -> Result<LoadOutcome, AdminError> {
        self.change_criteria(|state| {
            state.go_to_page(state.page_request().with_page(page));
            Ok(())
        })
        .await
    }

    /// Changes the page size (clamped to the configured maximum) and
    /// returns to page 1.
    pub async fn set_page_size(&self, page_size: u32) -> Result<LoadOutcome, AdminError> {
        let page_size = page_size.clamp(1, self.max_page_size);
        self.change_criteria(|state| {
            state.go_to_page(PageRequest::first(page_size));
            Ok(())
        })
        .await
    }

    pub async fn create(&self, draft: R::Draft) -> Result<R, AdminError> {
        draft.validate()?;
        match self.gateway.create(draft).await {
            Ok(record) => {
                self.apply_created(record.clone()).await;
                Ok(record)
            }
            Err(err) => Err(self.fail_mutation(err).await),
        }
    }

    pub async fn update(&self, id: i64, patch: R::Patch) -> Result<R, AdminError> {
        patch.validate()?;
        match self.gateway.update(id, patch).await {
            Ok(record) => {
                self.apply_updated(record.clone()).await;
                Ok(record)
            }
            Err(err) => Err(self.fail_mutation(err).await),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), AdminError> {
        match self.gateway.delete(id).await {
            Ok(_) => {
                self.apply_deleted(id).await;
                Ok(())
            }
            Err(err) => Err(self.fail_mutation(err).await),
        }
    }

    /// Fetches a record and makes it the selected item.
    pub async fn select(&self, id: i64) -> Result<R, AdminError> {
        match self.gateway.get(id).await {
            Ok(record) => {
                if !self.is_detached() {
                    self.state.lock().await.selected = Some(record.clone());
                }
                Ok(record)
            }
            Err(err) => Err(self.fail_mutation(err).await),
        }
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.selected = None;
    }

    /// Reloads when another view changed this resource since the last call.
    ///
    /// Returns true when a reload was issued. Changes made through this
    /// controller are already patched locally and do not count.
    pub async fn refresh_if_changed(&self) -> Result<bool, AdminError> {
        let changed = {
            let mut feed = self.changes.lock().await;
            feed.drain(None);
            feed.take_dirty()
        };

        if changed {
            debug!(resource = R::NAME, "External change seen, reloading");
            self.load().await?;
        }
        Ok(changed)
    }

    /// Invalidates every in-flight response. Later responses are ignored.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
        debug!(resource = R::NAME, "Controller detached");
    }

    /// Drains the feed right after a mutation so its own event is
    /// consumed before it can be mistaken for someone else's.
    async fn note_own(&self, kind: ChangeKind, id: i64) {
        self.changes.lock().await.drain(Some(ChangeEvent {
            resource: R::NAME,
            id,
            kind,
        }));
    }

    /// Reloads after a change to a record outside the current page. Totals
    /// and summary cannot be patched locally then.
    async fn refetch_off_page(&self, id: i64) {
        debug!(resource = R::NAME, id, "Changed record is off the page, refetching");
        if let Err(err) = self.load().await {
            warn!(resource = R::NAME, error = %err, "Refetch after off-page change failed");
        }
    }

    pub(crate) async fn apply_created(&self, record: R) {
        self.note_own(ChangeKind::Created, record.id()).await;
        if self.is_detached() {
            return;
        }
        debug!(resource = R::NAME, id = record.id(), "Record created");
        self.state.lock().await.insert_created(record);
    }

    pub(crate) async fn apply_updated(&self, record: R) {
        let id = record.id();
        self.note_own(ChangeKind::Updated, id).await;
        if self.is_detached() {
            return;
        }
        debug!(resource = R::NAME, id, "Record updated");
        let patched = {
            let mut state = self.state.lock().await;
            state.replace_updated(record) || !state.refetch_allowed()
        };
        if !patched {
            self.refetch_off_page(id).await;
        }
    }

    pub(crate) async fn apply_deleted(&self, id: i64) {
        self.note_own(ChangeKind::Deleted, id).await;
        if self.is_detached() {
            return;
        }
        debug!(resource = R::NAME, id, "Record deleted");
        let patched = {
            let mut state = self.state.lock().await;
            state.remove_deleted(id) || !state.refetch_allowed()
        };
        if !patched {
            self.refetch_off_page(id).await;
        }
    }

    /// Refetches the page so local state matches the gateway again, then
    /// records the failure.
    pub(crate) async fn fail_mutation(&self, err: GatewayError) -> AdminError {
        let err = AdminError::from(err);
        warn!(resource = R::NAME, error = %err, "Mutation failed, refetching page");

        if let Err(reload_err) = self.load().await {
            warn!(resource = R::NAME, error = %reload_err, "Refetch after failed mutation failed");
        }
        if !self.is_detached() {
            self.state.lock().await.fail(err.clone());
        }
        err
    }
}
