//! The resource abstraction shared by every list-bearing entity.
//!
//! A [`Resource`] ties an entity to its create request (`Draft`), its
//! partial update request (`Patch`), its filter criteria and the summary
//! statistics shown above its list.

use std::fmt::Debug;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::pagination::{PageInfo, PageRequest};
use thiserror::Error;
use validator::Validate;

/// Error type for filter field assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Unknown filter field '{field}' for {resource}")]
    UnknownField {
        resource: &'static str,
        field: String,
    },
    #[error("Invalid value '{value}' for filter field '{field}'")]
    InvalidValue { field: String, value: String },
}

/// An entity managed through a resource list.
pub trait Resource: Clone + Debug + PartialEq + Serialize + Send + Sync + 'static {
    /// Create request. Carries everything except the id.
    type Draft: Validate + Clone + Debug + Send + Sync + 'static;
    /// Partial update request, shallow-merged into the stored record.
    type Patch: Validate + Clone + Debug + Send + Sync + 'static;
    type Filter: ResourceFilter<Self>;
    type Summary: ResourceSummary<Self>;

    /// Singular resource name used in errors, logs and metrics.
    const NAME: &'static str;

    fn id(&self) -> i64;

    /// Build the stored record for a freshly assigned id.
    fn from_draft(id: i64, draft: Self::Draft, today: NaiveDate) -> Self;

    /// Merge a partial update into this record.
    fn apply_patch(&mut self, patch: Self::Patch, today: NaiveDate);
}

/// Filter criteria for one resource list.
///
/// Every set field must match (AND). `Default` is the cleared state.
pub trait ResourceFilter<R>:
    Clone + Debug + Default + PartialEq + Serialize + Send + Sync + 'static
{
    fn matches(&self, item: &R) -> bool;

    /// Assign one field by its wire name. An empty value clears the field.
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FilterError>;

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Derived statistics over a set of records.
pub trait ResourceSummary<R>:
    Clone + Debug + Default + PartialEq + Serialize + Send + Sync + 'static
{
    fn record(&mut self, item: &R);

    fn unrecord(&mut self, item: &R);

    fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        let mut summary = Self::default();
        for item in items {
            summary.record(item);
        }
        summary
    }
}

/// Filter plus pagination for a `list` call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery<F> {
    pub filter: F,
    #[serde(flatten)]
    pub page: PageRequest,
}

impl<F> ListQuery<F> {
    pub fn new(filter: F, page: PageRequest) -> Self {
        Self { filter, page }
    }
}

/// One page of `list` results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", bound = "R: Resource")]
pub struct ListPage<R: Resource> {
    pub items: Vec<R>,
    #[serde(flatten)]
    pub page: PageInfo,
    /// Statistics over every match, not just this page.
    pub summary: R::Summary,
}

/// Response for a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Lower-cases a field name and drops separators so `dateFrom`,
/// `date_from` and `DATE_FROM` compare equal.
pub fn normalize_field(field: &str) -> String {
    field
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Free-text field value; blank clears.
pub fn text_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses a typed field value; blank clears.
pub fn parse_value<T: FromStr>(field: &str, value: &str) -> Result<Option<T>, FilterError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| FilterError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Case-insensitive substring containment.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True when no search term is set or any column contains it.
pub fn matches_search(term: Option<&str>, columns: &[&str]) -> bool {
    match term {
        None => true,
        Some(term) => columns.iter().any(|c| contains_ignore_case(c, term)),
    }
}

/// Case-insensitive equality for an optional criterion.
pub fn matches_text_eq(criterion: Option<&str>, value: &str) -> bool {
    criterion.map_or(true, |c| c.to_lowercase() == value.trim().to_lowercase())
}

/// Exact equality for an optional criterion.
pub fn matches_eq<T: PartialEq>(criterion: Option<&T>, value: &T) -> bool {
    criterion.map_or(true, |c| c == value)
}

/// Inclusive date range check for optional bounds.
pub fn in_date_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_field() {
        assert_eq!(normalize_field("dateFrom"), "datefrom");
        assert_eq!(normalize_field("date_from"), "datefrom");
        assert_eq!(normalize_field("SEARCH"), "search");
    }

    #[test]
    fn test_text_value_blank_clears() {
        assert_eq!(text_value("  "), None);
        assert_eq!(text_value(" UK "), Some("UK".to_string()));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<i64>("universityId", "7").unwrap(), Some(7));
        assert_eq!(parse_value::<i64>("universityId", "").unwrap(), None);
        assert_eq!(
            parse_value::<i64>("universityId", "seven"),
            Err(FilterError::InvalidValue {
                field: "universityId".to_string(),
                value: "seven".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_value_dates() {
        let parsed = parse_value::<NaiveDate>("dateFrom", "2024-01-15").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert!(parse_value::<NaiveDate>("dateFrom", "15/01/2024").is_err());
    }

    #[test]
    fn test_matches_search() {
        assert!(matches_search(None, &["anything"]));
        assert!(matches_search(Some("ALICE"), &["bob", "Alice Johnson"]));
        assert!(!matches_search(Some("carol"), &["bob", "Alice Johnson"]));
    }

    #[test]
    fn test_matches_text_eq() {
        assert!(matches_text_eq(None, "UK"));
        assert!(matches_text_eq(Some("uk"), "UK"));
        assert!(!matches_text_eq(Some("uk"), "Ukraine"));
    }

    #[test]
    fn test_matches_text_eq_folds_unicode_case() {
        assert!(matches_text_eq(Some("türkiye"), "TÜRKIYE"));
        assert!(matches_text_eq(Some("ÖSTERREICH"), "Österreich "));
        assert!(!matches_text_eq(Some("österreich"), "Osterreich"));
    }

    #[test]
    fn test_in_date_range_is_inclusive() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        assert!(in_date_range(d(10), Some(d(10)), Some(d(10))));
        assert!(in_date_range(d(10), None, None));
        assert!(!in_date_range(d(9), Some(d(10)), None));
        assert!(!in_date_range(d(11), None, Some(d(10))));
    }
}
