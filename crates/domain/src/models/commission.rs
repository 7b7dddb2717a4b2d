//! Agent commission domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::resource::{
    in_date_range, matches_eq, matches_search, normalize_field, parse_value, text_value,
    FilterError, Resource, ResourceFilter, ResourceSummary,
};

fn default_currency() -> String {
    "USD".to_string()
}

/// Commission payout status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    #[default]
    Pending,
    Processing,
    Paid,
    Cancelled,
}

impl FromStr for CommissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(CommissionStatus::Pending),
            "processing" => Ok(CommissionStatus::Processing),
            "paid" => Ok(CommissionStatus::Paid),
            "cancelled" => Ok(CommissionStatus::Cancelled),
            _ => Err(format!("Unknown commission status: {}", s)),
        }
    }
}

impl std::fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommissionStatus::Pending => write!(f, "pending"),
            CommissionStatus::Processing => write!(f, "processing"),
            CommissionStatus::Paid => write!(f, "paid"),
            CommissionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Commission domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub university_id: i64,
    pub university_name: String,
    pub agent_id: i64,
    pub agent_name: String,
    pub amount: f64,
    /// Percentage of the tuition fee, 0 to 100.
    pub rate: f64,
    pub tuition_fee: f64,
    pub currency: String,
    pub status: CommissionStatus,
    pub created_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

impl Commission {
    /// `rate`% of `tuition_fee`, rounded to cents.
    pub fn expected_amount(rate: f64, tuition_fee: f64) -> f64 {
        (rate * tuition_fee).round() / 100.0
    }

    /// Sets the status. The first move into `paid` stamps `paid_date`.
    pub fn set_status(&mut self, status: CommissionStatus, today: NaiveDate) {
        self.status = status;
        if status == CommissionStatus::Paid && self.paid_date.is_none() {
            self.paid_date = Some(today);
        }
    }
}

/// Request to create a commission record.
///
/// `amount` defaults to `rate`% of `tuition_fee` when omitted. A supplied
/// amount is stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommissionRequest {
    #[validate(range(min = 1, message = "Student id must be positive"))]
    pub student_id: i64,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub student_name: String,
    #[validate(range(min = 1, message = "University id must be positive"))]
    pub university_id: i64,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub university_name: String,
    #[validate(range(min = 1, message = "Agent id must be positive"))]
    pub agent_id: i64,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub agent_name: String,
    #[validate(range(min = 0.0, message = "Amount must be non-negative"))]
    pub amount: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Rate must be between 0 and 100"))]
    pub rate: f64,
    #[validate(range(min = 0.0, message = "Tuition fee must be non-negative"))]
    pub tuition_fee: f64,
    #[serde(default = "default_currency")]
    #[validate(custom(function = "shared::validation::validate_currency_code"))]
    pub currency: String,
    #[serde(default)]
    pub status: CommissionStatus,
}

/// Request to update a commission record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommissionRequest {
    #[validate(range(min = 0.0, message = "Amount must be non-negative"))]
    pub amount: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Rate must be between 0 and 100"))]
    pub rate: Option<f64>,
    #[validate(range(min = 0.0, message = "Tuition fee must be non-negative"))]
    pub tuition_fee: Option<f64>,
    pub status: Option<CommissionStatus>,
}

impl UpdateCommissionRequest {
    pub fn status(status: CommissionStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Filter criteria for the commission list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionFilter {
    pub search: Option<String>,
    pub status: Option<CommissionStatus>,
    pub agent_id: Option<i64>,
    pub university_id: Option<i64>,
    pub student_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Summary strip for the commission list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSummary {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub paid: usize,
    pub cancelled: usize,
    /// Sum over every matching record regardless of status.
    pub total_amount: f64,
    pub paid_amount: f64,
    /// Pending plus processing.
    pub outstanding_amount: f64,
}

impl CommissionSummary {
    fn apply(&mut self, commission: &Commission, sign: f64) {
        let counter = match commission.status {
            CommissionStatus::Pending => &mut self.pending,
            CommissionStatus::Processing => &mut self.processing,
            CommissionStatus::Paid => &mut self.paid,
            CommissionStatus::Cancelled => &mut self.cancelled,
        };
        if sign > 0.0 {
            *counter += 1;
            self.total += 1;
        } else {
            *counter = counter.saturating_sub(1);
            self.total = self.total.saturating_sub(1);
        }

        let amount = sign * commission.amount;
        self.total_amount += amount;
        match commission.status {
            CommissionStatus::Paid => self.paid_amount += amount,
            CommissionStatus::Pending | CommissionStatus::Processing => {
                self.outstanding_amount += amount
            }
            CommissionStatus::Cancelled => {}
        }
    }
}

impl Resource for Commission {
    type Draft = CreateCommissionRequest;
    type Patch = UpdateCommissionRequest;
    type Filter = CommissionFilter;
    type Summary = CommissionSummary;

    const NAME: &'static str = "commission";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: CreateCommissionRequest, today: NaiveDate) -> Self {
        let amount = draft
            .amount
            .unwrap_or_else(|| Self::expected_amount(draft.rate, draft.tuition_fee));
        let mut commission = Self {
            id,
            student_id: draft.student_id,
            student_name: draft.student_name,
            university_id: draft.university_id,
            university_name: draft.university_name,
            agent_id: draft.agent_id,
            agent_name: draft.agent_name,
            amount,
            rate: draft.rate,
            tuition_fee: draft.tuition_fee,
            currency: draft.currency,
            status: CommissionStatus::Pending,
            created_date: today,
            paid_date: None,
        };
        commission.set_status(draft.status, today);
        commission
    }

    fn apply_patch(&mut self, patch: UpdateCommissionRequest, today: NaiveDate) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
        if let Some(fee) = patch.tuition_fee {
            self.tuition_fee = fee;
        }
        if let Some(status) = patch.status {
            self.set_status(status, today);
        }
    }
}

impl ResourceFilter<Commission> for CommissionFilter {
    fn matches(&self, commission: &Commission) -> bool {
        matches_search(
            self.search.as_deref(),
            &[
                commission.student_name.as_str(),
                commission.university_name.as_str(),
                commission.agent_name.as_str(),
            ],
        ) && matches_eq(self.status.as_ref(), &commission.status)
            && matches_eq(self.agent_id.as_ref(), &commission.agent_id)
            && matches_eq(self.university_id.as_ref(), &commission.university_id)
            && matches_eq(self.student_id.as_ref(), &commission.student_id)
            && in_date_range(commission.created_date, self.date_from, self.date_to)
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FilterError> {
        match normalize_field(field).as_str() {
            "search" | "searchterm" => self.search = text_value(value),
            "status" => self.status = parse_value(field, value)?,
            "agentid" => self.agent_id = parse_value(field, value)?,
            "universityid" => self.university_id = parse_value(field, value)?,
            "studentid" => self.student_id = parse_value(field, value)?,
            "datefrom" => self.date_from = parse_value(field, value)?,
            "dateto" => self.date_to = parse_value(field, value)?,
            _ => {
                return Err(FilterError::UnknownField {
                    resource: Commission::NAME,
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

impl ResourceSummary<Commission> for CommissionSummary {
    fn record(&mut self, commission: &Commission) {
        self.apply(commission, 1.0);
    }

    fn unrecord(&mut self, commission: &Commission) {
        self.apply(commission, -1.0);
    }
}
