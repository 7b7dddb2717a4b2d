//! Payment and refund domain models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::resource::{
    in_date_range, matches_eq, matches_search, matches_text_eq, normalize_field, parse_value,
    text_value, FilterError, Resource, ResourceFilter, ResourceSummary,
};

/// What a payment was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    ApplicationFee,
    ServiceFee,
    Tuition,
    Refund,
}

impl FromStr for PaymentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "application_fee" => Ok(PaymentKind::ApplicationFee),
            "service_fee" => Ok(PaymentKind::ServiceFee),
            "tuition" => Ok(PaymentKind::Tuition),
            "refund" => Ok(PaymentKind::Refund),
            _ => Err(format!("Unknown payment type: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentKind::ApplicationFee => write!(f, "application_fee"),
            PaymentKind::ServiceFee => write!(f, "service_fee"),
            PaymentKind::Tuition => write!(f, "tuition"),
            PaymentKind::Refund => write!(f, "refund"),
        }
    }
}

/// Settlement status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(format!("Unknown payment status: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Payment domain model. Refunds carry a negative amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub transaction_id: String,
    pub student_id: i64,
    pub student_name: String,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub description: String,
    pub payment_method: String,
    pub reference: String,
    pub created_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<String>,
}

impl Payment {
    /// Builds a completed refund record against this payment.
    pub fn refund(&self, id: i64, refund: RefundRequest, today: NaiveDate) -> Payment {
        Payment {
            id,
            transaction_id: format!("REF-{}", self.transaction_id),
            student_id: self.student_id,
            student_name: self.student_name.clone(),
            kind: PaymentKind::Refund,
            amount: -refund.amount,
            currency: self.currency.clone(),
            status: PaymentStatus::Completed,
            description: format!("Refund for {}", self.description),
            payment_method: self.payment_method.clone(),
            reference: format!("REF-{}", self.reference),
            created_date: today,
            completed_date: Some(today),
            refund_reason: Some(refund.reason),
        }
    }

    fn set_status(&mut self, status: PaymentStatus, today: NaiveDate) {
        self.status = status;
        if status == PaymentStatus::Completed && self.completed_date.is_none() {
            self.completed_date = Some(today);
        }
    }
}

/// Request to record a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[validate(range(min = 1, message = "Student id must be positive"))]
    pub student_id: i64,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub student_name: String,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub amount: f64,
    #[validate(custom(function = "shared::validation::validate_currency_code"))]
    pub currency: String,
    #[serde(default)]
    pub status: PaymentStatus,
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub payment_method: String,
    /// Defaults to the generated transaction id.
    pub reference: Option<String>,
}

/// Request to update a payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub status: Option<PaymentStatus>,
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
}

/// Request to refund part or all of a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    #[validate(range(exclusive_min = 0.0, message = "Refund amount must be greater than zero"))]
    pub amount: f64,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub reason: String,
}

/// Filter criteria for the payment list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFilter {
    pub search: Option<String>,
    pub status: Option<PaymentStatus>,
    #[serde(rename = "type")]
    pub kind: Option<PaymentKind>,
    pub student_id: Option<i64>,
    pub currency: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Summary strip for the payment list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total_payments: usize,
    pub completed: usize,
    pub pending: usize,
    pub failed: usize,
    /// Net of completed payments, refunds included.
    pub total_amount: f64,
    pub pending_amount: f64,
}

impl PaymentSummary {
    fn apply(&mut self, payment: &Payment, sign: f64) {
        let counter = match payment.status {
            PaymentStatus::Completed => &mut self.completed,
            PaymentStatus::Pending => &mut self.pending,
            PaymentStatus::Failed => &mut self.failed,
        };
        if sign > 0.0 {
            *counter += 1;
            self.total_payments += 1;
        } else {
            *counter = counter.saturating_sub(1);
            self.total_payments = self.total_payments.saturating_sub(1);
        }
        match payment.status {
            PaymentStatus::Completed => self.total_amount += sign * payment.amount,
            PaymentStatus::Pending => self.pending_amount += sign * payment.amount,
            PaymentStatus::Failed => {}
        }
    }
}

impl Resource for Payment {
    type Draft = CreatePaymentRequest;
    type Patch = UpdatePaymentRequest;
    type Filter = PaymentFilter;
    type Summary = PaymentSummary;

    const NAME: &'static str = "payment";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: CreatePaymentRequest, today: NaiveDate) -> Self {
        let transaction_id = format!("TXN-{}-{:04}", today.year(), id);
        let mut payment = Self {
            id,
            reference: draft.reference.unwrap_or_else(|| transaction_id.clone()),
            transaction_id,
            student_id: draft.student_id,
            student_name: draft.student_name,
            kind: draft.kind,
            amount: draft.amount,
            currency: draft.currency,
            status: PaymentStatus::Pending,
            description: draft.description,
            payment_method: draft.payment_method,
            created_date: today,
            completed_date: None,
            refund_reason: None,
        };
        payment.set_status(draft.status, today);
        payment
    }

    fn apply_patch(&mut self, patch: UpdatePaymentRequest, today: NaiveDate) {
        if let Some(status) = patch.status {
            self.set_status(status, today);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(method) = patch.payment_method {
            self.payment_method = method;
        }
        if let Some(reference) = patch.reference {
            self.reference = reference;
        }
    }
}

impl ResourceFilter<Payment> for PaymentFilter {
    fn matches(&self, payment: &Payment) -> bool {
        matches_search(
            self.search.as_deref(),
            &[
                payment.student_name.as_str(),
                payment.transaction_id.as_str(),
                payment.description.as_str(),
            ],
        ) && matches_eq(self.status.as_ref(), &payment.status)
            && matches_eq(self.kind.as_ref(), &payment.kind)
            && matches_eq(self.student_id.as_ref(), &payment.student_id)
            && matches_text_eq(self.currency.as_deref(), &payment.currency)
            && in_date_range(payment.created_date, self.date_from, self.date_to)
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FilterError> {
        match normalize_field(field).as_str() {
            "search" | "searchterm" => self.search = text_value(value),
            "status" => self.status = parse_value(field, value)?,
            "type" | "kind" => self.kind = parse_value(field, value)?,
            "studentid" => self.student_id = parse_value(field, value)?,
            "currency" => self.currency = text_value(value),
            "datefrom" => self.date_from = parse_value(field, value)?,
            "dateto" => self.date_to = parse_value(field, value)?,
            _ => {
                return Err(FilterError::UnknownField {
                    resource: Payment::NAME,
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

impl ResourceSummary<Payment> for PaymentSummary {
    fn record(&mut self, payment: &Payment) {
        self.apply(payment, 1.0);
    }

    fn unrecord(&mut self, payment: &Payment) {
        self.apply(payment, -1.0);
    }
}
