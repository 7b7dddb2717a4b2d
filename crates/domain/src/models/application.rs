//! Student application domain models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::resource::{
    in_date_range, matches_eq, matches_search, matches_text_eq, normalize_field, parse_value,
    text_value, FilterError, Resource, ResourceFilter, ResourceSummary,
};

/// Note recorded on the first timeline entry.
pub const SUBMITTED_NOTE: &str = "Application submitted successfully";

/// Application status through the admissions pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    DocumentsRequested,
    InterviewScheduled,
    InterviewCompleted,
    OfferReceived,
    Admitted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::DocumentsRequested => "documents_requested",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::InterviewCompleted => "interview_completed",
            ApplicationStatus::OfferReceived => "offer_received",
            ApplicationStatus::Admitted => "admitted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// True while the university is still assessing the application.
    pub fn is_in_review(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::UnderReview
                | ApplicationStatus::DocumentsRequested
                | ApplicationStatus::InterviewScheduled
                | ApplicationStatus::InterviewCompleted
        )
    }

    pub fn default_note(&self) -> String {
        format!("Status updated to {}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "under_review" => Ok(ApplicationStatus::UnderReview),
            "documents_requested" => Ok(ApplicationStatus::DocumentsRequested),
            "interview_scheduled" => Ok(ApplicationStatus::InterviewScheduled),
            "interview_completed" => Ok(ApplicationStatus::InterviewCompleted),
            "offer_received" => Ok(ApplicationStatus::OfferReceived),
            "admitted" => Ok(ApplicationStatus::Admitted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(format!("Unknown application status: {}", s)),
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in an application's status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub date: NaiveDate,
    pub status: ApplicationStatus,
    pub note: String,
}

/// Application domain model.
///
/// The timeline is append-only and its last entry always carries the
/// current status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub application_id: String,
    pub student_id: i64,
    pub student_name: String,
    pub university_id: i64,
    pub university_name: String,
    pub agent_id: i64,
    pub agent_name: String,
    pub program: String,
    pub country: String,
    pub status: ApplicationStatus,
    pub submitted_date: NaiveDate,
    pub last_updated: NaiveDate,
    pub timeline: Vec<TimelineEvent>,
}

impl Application {
    /// Moves to `status`, appending a timeline entry. Re-applying the
    /// current status is a no-op.
    pub fn transition(&mut self, status: ApplicationStatus, note: Option<String>, today: NaiveDate) {
        if self.status == status {
            return;
        }
        self.status = status;
        self.last_updated = today;
        self.timeline.push(TimelineEvent {
            date: today,
            status,
            note: note.unwrap_or_else(|| status.default_note()),
        });
    }
}

/// Request to create a new application. New applications always start
/// as `submitted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
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
    #[validate(length(min = 2, max = 255, message = "Program must be 2-255 characters"))]
    pub program: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub country: String,
}

/// Request to update an application.
///
/// `note` only applies when `status` changes the current status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    #[validate(length(min = 2, max = 255, message = "Program must be 2-255 characters"))]
    pub program: Option<String>,
    pub country: Option<String>,
    pub university_id: Option<i64>,
    pub university_name: Option<String>,
    pub agent_id: Option<i64>,
    pub agent_name: Option<String>,
    pub status: Option<ApplicationStatus>,
    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub note: Option<String>,
}

impl UpdateApplicationRequest {
    pub fn status(status: ApplicationStatus, note: Option<String>) -> Self {
        Self {
            status: Some(status),
            note,
            ..Default::default()
        }
    }
}

/// Filter criteria for the application list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilter {
    pub search: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub university_id: Option<i64>,
    pub agent_id: Option<i64>,
    pub student_id: Option<i64>,
    pub country: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Summary strip for the application list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub total: usize,
    pub submitted: usize,
    pub in_review: usize,
    pub offer_received: usize,
    pub admitted: usize,
    pub rejected: usize,
}

impl ApplicationSummary {
    fn status_counter(&mut self, status: ApplicationStatus) -> &mut usize {
        match status {
            ApplicationStatus::Submitted => &mut self.submitted,
            ApplicationStatus::OfferReceived => &mut self.offer_received,
            ApplicationStatus::Admitted => &mut self.admitted,
            ApplicationStatus::Rejected => &mut self.rejected,
            _ => &mut self.in_review,
        }
    }
}

impl Resource for Application {
    type Draft = CreateApplicationRequest;
    type Patch = UpdateApplicationRequest;
    type Filter = ApplicationFilter;
    type Summary = ApplicationSummary;

    const NAME: &'static str = "application";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: CreateApplicationRequest, today: NaiveDate) -> Self {
        Self {
            id,
            application_id: format!("APP-{}-{:03}", today.year(), id),
            student_id: draft.student_id,
            student_name: draft.student_name,
            university_id: draft.university_id,
            university_name: draft.university_name,
            agent_id: draft.agent_id,
            agent_name: draft.agent_name,
            program: draft.program,
            country: draft.country,
            status: ApplicationStatus::Submitted,
            submitted_date: today,
            last_updated: today,
            timeline: vec![TimelineEvent {
                date: today,
                status: ApplicationStatus::Submitted,
                note: SUBMITTED_NOTE.to_string(),
            }],
        }
    }

    fn apply_patch(&mut self, patch: UpdateApplicationRequest, today: NaiveDate) {
        if let Some(program) = patch.program {
            self.program = program;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(university_id) = patch.university_id {
            self.university_id = university_id;
        }
        if let Some(university_name) = patch.university_name {
            self.university_name = university_name;
        }
        if let Some(agent_id) = patch.agent_id {
            self.agent_id = agent_id;
        }
        if let Some(agent_name) = patch.agent_name {
            self.agent_name = agent_name;
        }
        if let Some(status) = patch.status {
            self.transition(status, patch.note, today);
        }
        self.last_updated = today;
    }
}

impl ResourceFilter<Application> for ApplicationFilter {
    fn matches(&self, app: &Application) -> bool {
        matches_search(
            self.search.as_deref(),
            &[
                app.student_name.as_str(),
                app.application_id.as_str(),
                app.program.as_str(),
                app.university_name.as_str(),
            ],
        ) && matches_eq(self.status.as_ref(), &app.status)
            && matches_eq(self.university_id.as_ref(), &app.university_id)
            && matches_eq(self.agent_id.as_ref(), &app.agent_id)
            && matches_eq(self.student_id.as_ref(), &app.student_id)
            && matches_text_eq(self.country.as_deref(), &app.country)
            && in_date_range(app.submitted_date, self.date_from, self.date_to)
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FilterError> {
        match normalize_field(field).as_str() {
            "search" | "searchterm" => self.search = text_value(value),
            "status" => self.status = parse_value(field, value)?,
            "universityid" => self.university_id = parse_value(field, value)?,
            "agentid" => self.agent_id = parse_value(field, value)?,
            "studentid" => self.student_id = parse_value(field, value)?,
            "country" => self.country = text_value(value),
            "datefrom" => self.date_from = parse_value(field, value)?,
            "dateto" => self.date_to = parse_value(field, value)?,
            _ => {
                return Err(FilterError::UnknownField {
                    resource: Application::NAME,
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

impl ResourceSummary<Application> for ApplicationSummary {
    fn record(&mut self, app: &Application) {
        self.total += 1;
        *self.status_counter(app.status) += 1;
    }

    fn unrecord(&mut self, app: &Application) {
        self.total = self.total.saturating_sub(1);
        let counter = self.status_counter(app.status);
        *counter = counter.saturating_sub(1);
    }
}
