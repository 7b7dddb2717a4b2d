//! Observable state of a list controller.

use domain::resource::{ListPage, Resource, ResourceFilter, ResourceSummary};
use serde::Serialize;
use shared::pagination::{total_pages, PageInfo, PageRequest};

use crate::error::AdminError;

/// Lifecycle of one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Full state of one list view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", bound = "R: Resource")]
pub struct ListState<R: Resource> {
    pub items: Vec<R>,
    pub filters: R::Filter,
    /// Requested page and size, with totals from the last applied load.
    pub pagination: PageInfo,
    pub loading: bool,
    pub error: Option<AdminError>,
    pub selected: Option<R>,
    /// Statistics over every record matching `filters`.
    pub summary: R::Summary,
    pub phase: Phase,
}

/// What the presentation layer should render. Exactly one applies.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<R> {
    Loading,
    Error(AdminError),
    Empty,
    Ready(Vec<R>),
}

impl<R> ListView<R> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListView::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ListView::Error(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ListView::Empty)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ListView::Ready(_))
    }
}

impl<R: Resource> ListState<R> {
    pub fn new(page: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            filters: R::Filter::default(),
            pagination: PageInfo::new(page, 0),
            loading: false,
            error: None,
            selected: None,
            summary: R::Summary::default(),
            phase: Phase::Idle,
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.pagination.current_page, self.pagination.page_size)
    }

    pub fn view(&self) -> ListView<R> {
        if self.loading {
            ListView::Loading
        } else if let Some(err) = &self.error {
            ListView::Error(err.clone())
        } else if self.items.is_empty() {
            ListView::Empty
        } else {
            ListView::Ready(self.items.clone())
        }
    }

    pub(crate) fn begin_load(&mut self) {
        self.loading = true;
        self.phase = Phase::Loading;
    }

    pub(crate) fn apply_page(&mut self, page: ListPage<R>) {
        self.items = page.items;
        self.pagination = page.page;
        self.summary = page.summary;
        self.loading = false;
        self.error = None;
        self.phase = Phase::Loaded;
    }

    /// Records a failure. Items from the last good load stay in place.
    pub(crate) fn fail(&mut self, err: AdminError) {
        self.loading = false;
        self.error = Some(err);
        self.phase = Phase::Errored;
    }

    pub(crate) fn go_to_page(&mut self, page: PageRequest) {
        self.pagination.current_page = page.page;
        if self.pagination.page_size != page.page_size {
            self.pagination.page_size = page.page_size;
            self.pagination.total_pages = total_pages(self.pagination.total, page.page_size);
        }
    }

    /// Idle lists have nothing to refresh and errored lists wait for a
    /// retry.
    pub(crate) fn refetch_allowed(&self) -> bool {
        !matches!(self.phase, Phase::Idle | Phase::Errored)
    }

    fn set_total(&mut self, total: usize) {
        self.pagination.total = total;
        self.pagination.total_pages = total_pages(total, self.pagination.page_size);
    }

    /// Adds a newly created record when it matches the current filters.
    ///
    /// Gateways order by ascending id and a new record always has the
    /// highest id, so it joins the end of the last page. It is only placed
    /// in `items` when that page is the one being shown.
    pub(crate) fn insert_created(&mut self, record: R) {
        if !self.filters.matches(&record) {
            return;
        }
        let position = self.pagination.total;
        let page_size = self.pagination.page_size.max(1) as usize;
        self.summary.record(&record);
        self.set_total(position + 1);
        if position / page_size + 1 == self.pagination.current_page as usize {
            self.items.push(record);
        }
    }

    /// Replaces a record in place. A record that no longer matches the
    /// filters leaves the page.
    ///
    /// Returns false when the record is not on the current page. Totals and
    /// summary cannot be patched from here in that case.
    pub(crate) fn replace_updated(&mut self, record: R) -> bool {
        if let Some(selected) = self.selected.as_mut() {
            if selected.id() == record.id() {
                *selected = record.clone();
            }
        }

        let Some(pos) = self.items.iter().position(|r| r.id() == record.id()) else {
            return false;
        };
        self.summary.unrecord(&self.items[pos]);
        if self.filters.matches(&record) {
            self.summary.record(&record);
            self.items[pos] = record;
        } else {
            self.items.remove(pos);
            self.set_total(self.pagination.total.saturating_sub(1));
        }
        true
    }

    /// Drops a deleted record. Returns false when it was not on the page.
    pub(crate) fn remove_deleted(&mut self, id: i64) -> bool {
        if self.selected.as_ref().is_some_and(|s| s.id() == id) {
            self.selected = None;
        }
        let Some(pos) = self.items.iter().position(|r| r.id() == id) else {
            return false;
        };
        let removed = self.items.remove(pos);
        self.summary.unrecord(&removed);
        self.set_total(self.pagination.total.saturating_sub(1));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain::models::user::{CreateUserRequest, UserFilter, UserSummary};
    use domain::models::{AccountStatus, User, UserRole};

    fn user(id: i64, role: UserRole) -> User {
        User::from_draft(
            id,
            CreateUserRequest {
                name: format!("User {id}"),
                email: format!("user{id}@uni360.com"),
                role,
                status: AccountStatus::Active,
                country: "UK".to_string(),
                phone: None,
            },
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    fn loaded(items: Vec<User>, page_size: u32) -> ListState<User> {
        let mut state = ListState::new(PageRequest::first(page_size));
        let summary = UserSummary::from_items(items.iter());
        let total = items.len();
        state.apply_page(ListPage {
            items,
            page: PageInfo::new(PageRequest::first(page_size), total),
            summary,
        });
        state
    }

    #[test]
    fn test_view_priority() {
        let mut state = loaded(vec![user(1, UserRole::Student)], 10);
        assert!(state.view().is_ready());

        state.fail(AdminError::validation("boom"));
        assert!(state.view().is_error());

        state.begin_load();
        assert!(state.view().is_loading());

        let empty = loaded(Vec::new(), 10);
        assert!(empty.view().is_empty());
    }

    #[test]
    fn test_failure_keeps_items() {
        let mut state = loaded(vec![user(1, UserRole::Student)], 10);
        state.fail(AdminError::NotFound {
            resource: "user",
            id: 1,
        });
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.phase, Phase::Errored);
        assert!(!state.refetch_allowed());
    }

    #[test]
    fn test_insert_created_respects_filters() {
        let mut state = loaded(vec![user(1, UserRole::Student)], 2);
        state.filters = UserFilter {
            role: Some(UserRole::Student),
            ..Default::default()
        };

        state.insert_created(user(2, UserRole::Agent));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.summary.total, 1);

        state.insert_created(user(3, UserRole::Student));
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[1].id, 3);

        // Lands on page 2, which is not shown.
        state.insert_created(user(4, UserRole::Student));
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].id, 1);
        assert_eq!(state.pagination.total, 3);
        assert_eq!(state.pagination.total_pages, 2);
        assert_eq!(state.summary.students, 3);
    }

    #[test]
    fn test_insert_created_joins_last_page_in_id_order() {
        let mut state = loaded(vec![user(1, UserRole::Student), user(2, UserRole::Student)], 2);
        state.insert_created(user(3, UserRole::Student));
        assert_eq!(state.pagination.total_pages, 2);

        let mut on_last = state.clone();
        on_last.go_to_page(PageRequest::new(2, 2));
        on_last.items = vec![user(3, UserRole::Student)];
        on_last.insert_created(user(4, UserRole::Student));
        assert_eq!(on_last.items.len(), 2);
        assert_eq!(on_last.items[1].id, 4);
        assert_eq!(on_last.pagination.total, 4);

        let ids: Vec<i64> = state.items.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_replace_updated_adjusts_summary() {
        let mut state = loaded(vec![user(1, UserRole::Student), user(2, UserRole::Student)], 10);
        let mut changed = state.items[0].clone();
        changed.status = AccountStatus::Inactive;
        assert!(state.replace_updated(changed));
        assert_eq!(state.summary.active, 1);
        assert_eq!(state.summary.total, 2);
        assert_eq!(state.items[0].status, AccountStatus::Inactive);
    }

    #[test]
    fn test_replace_updated_drops_non_matching() {
        let mut state = loaded(vec![user(1, UserRole::Student)], 10);
        state.filters.status = Some(AccountStatus::Active);
        let mut changed = state.items[0].clone();
        changed.status = AccountStatus::Inactive;
        assert!(state.replace_updated(changed));
        assert!(state.items.is_empty());
        assert_eq!(state.pagination.total, 0);
        assert_eq!(state.summary.total, 0);
    }

    #[test]
    fn test_remove_deleted_clears_selection() {
        let mut state = loaded(vec![user(1, UserRole::Student), user(2, UserRole::Admin)], 10);
        state.selected = Some(state.items[1].clone());
        assert!(state.remove_deleted(2));
        assert!(state.selected.is_none());
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.summary.admins, 0);
        assert_eq!(state.pagination.total, 1);
    }

    #[test]
    fn test_off_page_changes_are_reported() {
        let mut state = loaded(vec![user(1, UserRole::Student)], 10);
        state.pagination.total = 5;
        assert!(state.refetch_allowed());
        assert!(!state.remove_deleted(4));
        assert!(!state.replace_updated(user(3, UserRole::Agent)));
        assert_eq!(state.pagination.total, 5);
        assert_eq!(state.summary.total, 1);
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let state = loaded(vec![user(1, UserRole::Student)], 10);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["phase"], "loaded");
        assert_eq!(json["pagination"]["totalPages"], 1);
        assert!(json["selected"].is_null());
    }
}
