//! Counselling appointment domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::resource::{
    in_date_range, matches_eq, matches_search, matches_text_eq, normalize_field, parse_value,
    text_value, FilterError, Resource, ResourceFilter, ResourceSummary,
};

/// Approver recorded when an appointment is approved from the admin panel.
pub const ADMIN_APPROVER: &str = "Admin User";

/// Purpose of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentKind {
    Consultation,
    ApplicationReview,
    DocumentReview,
    VisaGuidance,
}

impl AppointmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentKind::Consultation => "consultation",
            AppointmentKind::ApplicationReview => "application_review",
            AppointmentKind::DocumentReview => "document_review",
            AppointmentKind::VisaGuidance => "visa_guidance",
        }
    }
}

impl FromStr for AppointmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "consultation" => Ok(AppointmentKind::Consultation),
            "application_review" => Ok(AppointmentKind::ApplicationReview),
            "document_review" => Ok(AppointmentKind::DocumentReview),
            "visa_guidance" => Ok(AppointmentKind::VisaGuidance),
            _ => Err(format!("Unknown appointment type: {}", s)),
        }
    }
}

impl std::fmt::Display for AppointmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Approved,
    Completed,
    Cancelled,
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "approved" => Ok(AppointmentStatus::Approved),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Unknown appointment status: {}", s)),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Approved => write!(f, "approved"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Appointment domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub agent_id: i64,
    pub agent_name: String,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
    pub date: NaiveDate,
    /// `HH:MM`, 24-hour clock.
    pub time: String,
    pub status: AppointmentStatus,
    pub booked_date: NaiveDate,
    pub approved_by: Option<String>,
    pub approved_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Appointment {
    /// Sets the status. Approval stamps the approver and date; `notes`
    /// replaces the stored notes only when given.
    pub fn set_status(&mut self, status: AppointmentStatus, notes: Option<String>, today: NaiveDate) {
        self.status = status;
        if status == AppointmentStatus::Approved {
            self.approved_by = Some(ADMIN_APPROVER.to_string());
            self.approved_date = Some(today);
        }
        if notes.is_some() {
            self.notes = notes;
        }
    }
}

/// Request to book an appointment. Bookings start as `pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[validate(range(min = 1, message = "Student id must be positive"))]
    pub student_id: i64,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub student_name: String,
    #[validate(range(min = 1, message = "Agent id must be positive"))]
    pub agent_id: i64,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub agent_name: String,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
    pub date: NaiveDate,
    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub time: String,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// Request to update or reschedule an appointment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub date: Option<NaiveDate>,
    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub time: Option<String>,
    pub status: Option<AppointmentStatus>,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn status(status: AppointmentStatus, notes: Option<String>) -> Self {
        Self {
            status: Some(status),
            notes,
            ..Default::default()
        }
    }
}

/// Filter criteria for the appointment list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFilter {
    pub search: Option<String>,
    pub status: Option<AppointmentStatus>,
    #[serde(rename = "type")]
    pub kind: Option<AppointmentKind>,
    pub student_id: Option<i64>,
    pub student_name: Option<String>,
    pub agent_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl AppointmentSummary {
    fn status_counter(&mut self, status: AppointmentStatus) -> &mut usize {
        match status {
            AppointmentStatus::Pending => &mut self.pending,
            AppointmentStatus::Approved => &mut self.approved,
            AppointmentStatus::Completed => &mut self.completed,
            AppointmentStatus::Cancelled => &mut self.cancelled,
        }
    }
}

impl Resource for Appointment {
    type Draft = CreateAppointmentRequest;
    type Patch = UpdateAppointmentRequest;
    type Filter = AppointmentFilter;
    type Summary = AppointmentSummary;

    const NAME: &'static str = "appointment";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: CreateAppointmentRequest, today: NaiveDate) -> Self {
        Self {
            id,
            student_id: draft.student_id,
            student_name: draft.student_name,
            agent_id: draft.agent_id,
            agent_name: draft.agent_name,
            kind: draft.kind,
            date: draft.date,
            time: draft.time,
            status: AppointmentStatus::Pending,
            booked_date: today,
            approved_by: None,
            approved_date: None,
            notes: draft.notes,
        }
    }

    fn apply_patch(&mut self, patch: UpdateAppointmentRequest, today: NaiveDate) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        match patch.status {
            Some(status) => self.set_status(status, patch.notes, today),
            None => {
                if patch.notes.is_some() {
                    self.notes = patch.notes;
                }
            }
        }
    }
}

impl ResourceFilter<Appointment> for AppointmentFilter {
    fn matches(&self, appt: &Appointment) -> bool {
        matches_search(
            self.search.as_deref(),
            &[appt.student_name.as_str(), appt.agent_name.as_str(), appt.kind.as_str()],
        ) && matches_eq(self.status.as_ref(), &appt.status)
            && matches_eq(self.kind.as_ref(), &appt.kind)
            && matches_eq(self.student_id.as_ref(), &appt.student_id)
            && matches_text_eq(self.student_name.as_deref(), &appt.student_name)
            && matches_eq(self.agent_id.as_ref(), &appt.agent_id)
            && in_date_range(appt.date, self.date_from, self.date_to)
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FilterError> {
        match normalize_field(field).as_str() {
            "search" | "searchterm" => self.search = text_value(value),
            "status" => self.status = parse_value(field, value)?,
            "type" | "kind" => self.kind = parse_value(field, value)?,
            "studentid" => self.student_id = parse_value(field, value)?,
            "studentname" => self.student_name = text_value(value),
            "agentid" => self.agent_id = parse_value(field, value)?,
            "datefrom" => self.date_from = parse_value(field, value)?,
            "dateto" => self.date_to = parse_value(field, value)?,
            _ => {
                return Err(FilterError::UnknownField {
                    resource: Appointment::NAME,
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

impl ResourceSummary<Appointment> for AppointmentSummary {
    fn record(&mut self, appt: &Appointment) {
        self.total += 1;
        *self.status_counter(appt.status) += 1;
    }

    fn unrecord(&mut self, appt: &Appointment) {
        self.total = self.total.saturating_sub(1);
        let counter = self.status_counter(appt.status);
        *counter = counter.saturating_sub(1);
    }
}
