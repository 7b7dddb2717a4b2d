//! Partner university domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use validator::Validate;

use super::user::AccountStatus;
use crate::resource::{
    matches_eq, matches_search, matches_text_eq, normalize_field, parse_value, text_value,
    FilterError, Resource, ResourceFilter, ResourceSummary,
};

/// Funding type of a university.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniversityKind {
    #[default]
    Public,
    Private,
}

impl FromStr for UniversityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(UniversityKind::Public),
            "private" => Ok(UniversityKind::Private),
            _ => Err(format!("Unknown university type: {}", s)),
        }
    }
}

impl std::fmt::Display for UniversityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniversityKind::Public => write!(f, "public"),
            UniversityKind::Private => write!(f, "private"),
        }
    }
}

/// University domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: UniversityKind,
    /// Lower is better.
    pub ranking: u32,
    pub tuition_fee: f64,
    /// Percentage, 0 to 100.
    pub commission_rate: f64,
    pub status: AccountStatus,
    pub program_count: u32,
    pub website: Option<String>,
}

/// Request to create a new university.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUniversityRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2-255 characters"))]
    pub name: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub country: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub location: String,
    #[serde(default, rename = "type")]
    pub kind: UniversityKind,
    #[validate(range(min = 1, message = "Ranking must be at least 1"))]
    pub ranking: u32,
    #[validate(range(min = 0.0, message = "Tuition fee must be non-negative"))]
    pub tuition_fee: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "Commission rate must be between 0 and 100"))]
    pub commission_rate: f64,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub program_count: u32,
    pub website: Option<String>,
}

/// Request to update a university.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUniversityRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<UniversityKind>,
    #[validate(range(min = 1, message = "Ranking must be at least 1"))]
    pub ranking: Option<u32>,
    #[validate(range(min = 0.0, message = "Tuition fee must be non-negative"))]
    pub tuition_fee: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Commission rate must be between 0 and 100"))]
    pub commission_rate: Option<f64>,
    pub status: Option<AccountStatus>,
    pub program_count: Option<u32>,
    pub website: Option<String>,
}

/// Filter criteria for the university list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityFilter {
    pub search: Option<String>,
    pub country: Option<String>,
    pub status: Option<AccountStatus>,
    #[serde(rename = "type")]
    pub kind: Option<UniversityKind>,
    pub tuition_fee_min: Option<f64>,
    pub tuition_fee_max: Option<f64>,
}

/// Summary strip for the university list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversitySummary {
    pub total: usize,
    pub active: usize,
    pub by_country: BTreeMap<String, usize>,
}

impl Resource for University {
    type Draft = CreateUniversityRequest;
    type Patch = UpdateUniversityRequest;
    type Filter = UniversityFilter;
    type Summary = UniversitySummary;

    const NAME: &'static str = "university";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: CreateUniversityRequest, _today: NaiveDate) -> Self {
        Self {
            id,
            name: draft.name,
            country: draft.country,
            location: draft.location,
            kind: draft.kind,
            ranking: draft.ranking,
            tuition_fee: draft.tuition_fee,
            commission_rate: draft.commission_rate,
            status: draft.status,
            program_count: draft.program_count,
            website: draft.website,
        }
    }

    fn apply_patch(&mut self, patch: UpdateUniversityRequest, _today: NaiveDate) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(ranking) = patch.ranking {
            self.ranking = ranking;
        }
        if let Some(fee) = patch.tuition_fee {
            self.tuition_fee = fee;
        }
        if let Some(rate) = patch.commission_rate {
            self.commission_rate = rate;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(count) = patch.program_count {
            self.program_count = count;
        }
        if let Some(website) = patch.website {
            self.website = Some(website);
        }
    }
}

impl ResourceFilter<University> for UniversityFilter {
    fn matches(&self, uni: &University) -> bool {
        matches_search(self.search.as_deref(), &[uni.name.as_str(), uni.location.as_str()])
            && matches_text_eq(self.country.as_deref(), &uni.country)
            && matches_eq(self.status.as_ref(), &uni.status)
            && matches_eq(self.kind.as_ref(), &uni.kind)
            && self.tuition_fee_min.map_or(true, |min| uni.tuition_fee >= min)
            && self.tuition_fee_max.map_or(true, |max| uni.tuition_fee <= max)
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FilterError> {
        match normalize_field(field).as_str() {
            "search" | "searchterm" => self.search = text_value(value),
            "country" => self.country = text_value(value),
            "status" => self.status = parse_value(field, value)?,
            "type" | "kind" => self.kind = parse_value(field, value)?,
            "tuitionfeemin" => self.tuition_fee_min = parse_value(field, value)?,
            "tuitionfeemax" => self.tuition_fee_max = parse_value(field, value)?,
            _ => {
                return Err(FilterError::UnknownField {
                    resource: University::NAME,
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

impl ResourceSummary<University> for UniversitySummary {
    fn record(&mut self, uni: &University) {
        self.total += 1;
        if uni.status == AccountStatus::Active {
            self.active += 1;
        }
        *self.by_country.entry(uni.country.clone()).or_insert(0) += 1;
    }

    fn unrecord(&mut self, uni: &University) {
        self.total = self.total.saturating_sub(1);
        if uni.status == AccountStatus::Active {
            self.active = self.active.saturating_sub(1);
        }
        if let Some(count) = self.by_country.get_mut(&uni.country) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.by_country.remove(&uni.country);
            }
        }
    }
}
