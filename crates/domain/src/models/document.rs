//! Student document domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::resource::{
    in_date_range, matches_eq, matches_search, matches_text_eq, normalize_field, parse_value,
    text_value, FilterError, Resource, ResourceFilter, ResourceSummary,
};

/// Reviewer recorded when a document is approved from the admin panel.
pub const MANUAL_REVIEWER: &str = "Manual Review";

/// Kind of document a student uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Passport,
    Transcript,
    EnglishTest,
    StatementOfPurpose,
    RecommendationLetter,
    FinancialStatement,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Passport => "passport",
            DocumentKind::Transcript => "transcript",
            DocumentKind::EnglishTest => "english_test",
            DocumentKind::StatementOfPurpose => "statement_of_purpose",
            DocumentKind::RecommendationLetter => "recommendation_letter",
            DocumentKind::FinancialStatement => "financial_statement",
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "passport" => Ok(DocumentKind::Passport),
            "transcript" => Ok(DocumentKind::Transcript),
            "english_test" => Ok(DocumentKind::EnglishTest),
            "statement_of_purpose" => Ok(DocumentKind::StatementOfPurpose),
            "recommendation_letter" => Ok(DocumentKind::RecommendationLetter),
            "financial_statement" => Ok(DocumentKind::FinancialStatement),
            _ => Err(format!("Unknown document type: {}", s)),
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verification status of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(DocumentStatus::Pending),
            "approved" => Ok(DocumentStatus::Approved),
            "rejected" => Ok(DocumentStatus::Rejected),
            _ => Err(format!("Unknown document status: {}", s)),
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Pending => write!(f, "pending"),
            DocumentStatus::Approved => write!(f, "approved"),
            DocumentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Document domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub file_name: String,
    pub status: DocumentStatus,
    pub uploaded_date: NaiveDate,
    pub verified_by: Option<String>,
    pub verification_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
}

impl Document {
    /// Sets the review status.
    ///
    /// Approval stamps the reviewer and date. Rejection stores `reason`.
    pub fn review(&mut self, status: DocumentStatus, reason: Option<String>, today: NaiveDate) {
        self.status = status;
        match status {
            DocumentStatus::Approved => {
                self.verified_by = Some(MANUAL_REVIEWER.to_string());
                self.verification_date = Some(today);
            }
            DocumentStatus::Rejected => self.rejection_reason = reason,
            DocumentStatus::Pending => {}
        }
    }
}

/// Request to register an uploaded document. New documents await review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[validate(range(min = 1, message = "Student id must be positive"))]
    pub student_id: i64,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub student_name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: String,
}

/// Request to update a document.
///
/// `reason` is only kept when `status` is `rejected`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: Option<String>,
    pub status: Option<DocumentStatus>,
    #[validate(length(max = 1000, message = "Reason must be at most 1000 characters"))]
    pub reason: Option<String>,
}

impl UpdateDocumentRequest {
    pub fn status(status: DocumentStatus, reason: Option<String>) -> Self {
        Self {
            status: Some(status),
            reason,
            ..Default::default()
        }
    }
}

/// Filter criteria for the document list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    pub search: Option<String>,
    pub status: Option<DocumentStatus>,
    #[serde(rename = "type")]
    pub kind: Option<DocumentKind>,
    pub student_id: Option<i64>,
    pub student_name: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Summary strip for the document list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl DocumentSummary {
    fn status_counter(&mut self, status: DocumentStatus) -> &mut usize {
        match status {
            DocumentStatus::Pending => &mut self.pending,
            DocumentStatus::Approved => &mut self.approved,
            DocumentStatus::Rejected => &mut self.rejected,
        }
    }
}

impl Resource for Document {
    type Draft = CreateDocumentRequest;
    type Patch = UpdateDocumentRequest;
    type Filter = DocumentFilter;
    type Summary = DocumentSummary;

    const NAME: &'static str = "document";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: CreateDocumentRequest, today: NaiveDate) -> Self {
        Self {
            id,
            student_id: draft.student_id,
            student_name: draft.student_name,
            kind: draft.kind,
            file_name: draft.file_name,
            status: DocumentStatus::Pending,
            uploaded_date: today,
            verified_by: None,
            verification_date: None,
            rejection_reason: None,
        }
    }

    fn apply_patch(&mut self, patch: UpdateDocumentRequest, today: NaiveDate) {
        if let Some(file_name) = patch.file_name {
            self.file_name = file_name;
        }
        if let Some(status) = patch.status {
            self.review(status, patch.reason, today);
        }
    }
}

impl ResourceFilter<Document> for DocumentFilter {
    fn matches(&self, doc: &Document) -> bool {
        matches_search(
            self.search.as_deref(),
            &[doc.student_name.as_str(), doc.file_name.as_str(), doc.kind.as_str()],
        ) && matches_eq(self.status.as_ref(), &doc.status)
            && matches_eq(self.kind.as_ref(), &doc.kind)
            && matches_eq(self.student_id.as_ref(), &doc.student_id)
            && matches_text_eq(self.student_name.as_deref(), &doc.student_name)
            && in_date_range(doc.uploaded_date, self.date_from, self.date_to)
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FilterError> {
        match normalize_field(field).as_str() {
            "search" | "searchterm" => self.search = text_value(value),
            "status" => self.status = parse_value(field, value)?,
            "type" | "kind" => self.kind = parse_value(field, value)?,
            "studentid" => self.student_id = parse_value(field, value)?,
            "studentname" => self.student_name = text_value(value),
            "datefrom" => self.date_from = parse_value(field, value)?,
            "dateto" => self.date_to = parse_value(field, value)?,
            _ => {
                return Err(FilterError::UnknownField {
                    resource: Document::NAME,
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

impl ResourceSummary<Document> for DocumentSummary {
    fn record(&mut self, doc: &Document) {
        self.total += 1;
        *self.status_counter(doc.status) += 1;
    }

    fn unrecord(&mut self, doc: &Document) {
        self.total = self.total.saturating_sub(1);
        let counter = self.status_counter(doc.status);
        *counter = counter.saturating_sub(1);
    }
}
