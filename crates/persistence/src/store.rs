//! In-memory fixture store.
//!
//! A [`FixtureStore`] is the backing table for one resource type. Clones
//! share the same table, so every gateway and view built over a store sees
//! the same data. Ids come from a counter kept next to the table and are
//! never reused.

use std::collections::BTreeMap;
use std::sync::Arc;

use domain::resource::{ListPage, ListQuery, Resource, ResourceFilter, ResourceSummary};
use domain::services::{ChangeEvent, ChangeKind};
use shared::pagination::{paginate, PageInfo, PageRequest};
use tokio::sync::{broadcast, RwLock};
use tracing::trace;

use crate::metrics::record_change;

/// Capacity of the change channel. Slow subscribers see a lag error and
/// should treat it as "something changed".
const CHANGE_CHANNEL_CAPACITY: usize = 256;

struct Table<R> {
    rows: BTreeMap<i64, R>,
    next_id: i64,
}

/// Shared in-memory table for one resource type.
pub struct FixtureStore<R: Resource> {
    table: Arc<RwLock<Table<R>>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl<R: Resource> Clone for FixtureStore<R> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            changes: self.changes.clone(),
        }
    }
}

impl<R: Resource> Default for FixtureStore<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R: Resource> FixtureStore<R> {
    /// Creates a store seeded with `records`. The id counter starts after
    /// the largest seeded id.
    pub fn new(records: Vec<R>) -> Self {
        let rows: BTreeMap<i64, R> = records.into_iter().map(|r| (r.id(), r)).collect();
        let next_id = rows.keys().next_back().map_or(1, |max| max + 1);
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            table: Arc::new(RwLock::new(Table { rows, next_id })),
            changes,
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Every record, ordered by id.
    pub async fn all(&self) -> Vec<R> {
        self.table.read().await.rows.values().cloned().collect()
    }

    /// Runs a filtered, paginated query. The summary covers every match,
    /// not only the returned page.
    pub async fn query(&self, query: &ListQuery<R::Filter>) -> ListPage<R> {
        let request = PageRequest::new(query.page.page, query.page.page_size);
        let table = self.table.read().await;
        let matches: Vec<&R> = table
            .rows
            .values()
            .filter(|r| query.filter.matches(r))
            .collect();

        let summary = R::Summary::from_items(matches.iter().copied());
        let page = PageInfo::new(request, matches.len());
        let items = paginate(&matches, request).into_iter().cloned().collect();

        ListPage {
            items,
            page,
            summary,
        }
    }

    pub async fn get(&self, id: i64) -> Option<R> {
        self.table.read().await.rows.get(&id).cloned()
    }

    /// Assigns the next id, stores the record built from it and returns it.
    pub async fn insert_with<F>(&self, build: F) -> R
    where
        F: FnOnce(i64) -> R,
    {
        let record = {
            let mut table = self.table.write().await;
            let id = table.next_id;
            table.next_id += 1;
            let record = build(id);
            table.rows.insert(id, record.clone());
            record
        };
        self.publish(record.id(), ChangeKind::Created);
        record
    }

    /// Applies `change` to the stored record and returns the result, or
    /// `None` when no record has this id.
    pub async fn update_with<F>(&self, id: i64, change: F) -> Option<R>
    where
        F: FnOnce(&mut R),
    {
        let updated = {
            let mut table = self.table.write().await;
            let record = table.rows.get_mut(&id)?;
            change(record);
            record.clone()
        };
        self.publish(id, ChangeKind::Updated);
        Some(updated)
    }

    /// Removes a record permanently.
    pub async fn remove(&self, id: i64) -> Option<R> {
        let removed = self.table.write().await.rows.remove(&id)?;
        self.publish(id, ChangeKind::Deleted);
        Some(removed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    fn publish(&self, id: i64, kind: ChangeKind) {
        let event = ChangeEvent {
            resource: R::NAME,
            id,
            kind,
        };
        // No subscribers is fine.
        let receivers = self.changes.send(event).unwrap_or(0);
        trace!(resource = R::NAME, id, kind = %kind, receivers, "Published change");
        record_change(R::NAME, kind.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain::models::university::{CreateUniversityRequest, UniversityFilter, UniversityKind};
    use domain::models::{AccountStatus, University};

    fn uni(id: i64, name: &str, country: &str) -> University {
        University::from_draft(
            id,
            CreateUniversityRequest {
                name: name.to_string(),
                country: country.to_string(),
                location: "Campus".to_string(),
                kind: UniversityKind::Public,
                ranking: 10,
                tuition_fee: 20000.0,
                commission_rate: 10.0,
                status: AccountStatus::Active,
                program_count: 12,
                website: None,
            },
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    fn store_of(n: i64) -> FixtureStore<University> {
        FixtureStore::new((1..=n).map(|i| uni(i, &format!("Uni {i}"), "UK")).collect())
    }

    #[tokio::test]
    async fn test_ids_continue_after_largest_seed() {
        let store = FixtureStore::new(vec![uni(3, "A", "UK"), uni(9, "B", "UK")]);
        let created = store.insert_with(|id| uni(id, "C", "UK")).await;
        assert_eq!(created.id, 10);
    }

    #[tokio::test]
    async fn test_ids_never_reused_after_delete() {
        let store = store_of(3);
        store.remove(3).await.unwrap();
        store.remove(1).await.unwrap();
        let created = store.insert_with(|id| uni(id, "D", "UK")).await;
        assert_eq!(created.id, 4);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_query_slices_pages() {
        let store = store_of(25);
        let query = ListQuery::new(UniversityFilter::default(), PageRequest::new(3, 10));
        let page = store.query(&query).await;
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].id, 21);
        assert_eq!(page.page.total, 25);
        assert_eq!(page.page.total_pages, 3);
        assert_eq!(page.summary.total, 25);
    }

    #[tokio::test]
    async fn test_query_past_last_page_is_empty() {
        let store = store_of(7);
        let query = ListQuery::new(UniversityFilter::default(), PageRequest::new(2, 10));
        let page = store.query(&query).await;
        assert!(page.items.is_empty());
        assert_eq!(page.page.total, 7);
        assert_eq!(page.page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_query_clamps_raw_page_request() {
        let store = store_of(3);
        let query = ListQuery::new(
            UniversityFilter::default(),
            PageRequest {
                page: 0,
                page_size: 0,
            },
        );
        let page = store.query(&query).await;
        assert_eq!(page.page.current_page, 1);
        assert_eq!(page.page.page_size, 1);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_mutations_publish_changes() {
        let store = store_of(2);
        let mut rx = store.subscribe();

        store.insert_with(|id| uni(id, "New", "UK")).await;
        store.update_with(1, |u| u.ranking = 1).await.unwrap();
        store.remove(2).await.unwrap();
        assert!(store.update_with(99, |u| u.ranking = 1).await.is_none());

        let kinds: Vec<(i64, ChangeKind)> = (0..3)
            .map(|_| {
                let event = rx.try_recv().unwrap();
                (event.id, event.kind)
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                (3, ChangeKind::Created),
                (1, ChangeKind::Updated),
                (2, ChangeKind::Deleted)
            ]
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_clones_share_table() {
        let store = store_of(1);
        let other = store.clone();
        other.insert_with(|id| uni(id, "Shared", "UK")).await;
        assert_eq!(store.len().await, 2);
        assert_eq!(store.all().await[1].name, "Shared");
    }
}
