//! Resource gateway service traits.
//!
//! A gateway is the async read/write surface for one resource type. It
//! stands in for a backend API: every read and write goes through it, and
//! every successful write is announced on a change channel so that
//! independent list views of the same resource can refresh.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::models::application::{Application, ApplicationStatus, UpdateApplicationRequest};
use crate::models::appointment::{Appointment, AppointmentStatus, UpdateAppointmentRequest};
use crate::models::commission::{Commission, CommissionStatus, UpdateCommissionRequest};
use crate::models::document::{Document, DocumentStatus, UpdateDocumentRequest};
use crate::models::payment::{Payment, RefundRequest};
use crate::resource::{DeleteResponse, ListPage, ListQuery, Resource};

/// Gateway failure. A referenced id that does not exist is the only way a
/// gateway call can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },
}

impl GatewayError {
    pub fn not_found<R: Resource>(id: i64) -> Self {
        GatewayError::NotFound {
            resource: R::NAME,
            id,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Kind of mutation carried by a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Published after every successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub resource: &'static str,
    pub id: i64,
    pub kind: ChangeKind,
}

/// Async CRUD surface for one resource type.
#[async_trait::async_trait]
pub trait ResourceGateway<R: Resource>: Send + Sync {
    /// One page of records matching every criterion of the filter.
    async fn list(&self, query: ListQuery<R::Filter>) -> GatewayResult<ListPage<R>>;

    async fn get(&self, id: i64) -> GatewayResult<R>;

    /// Stores a new record under a freshly assigned id.
    async fn create(&self, draft: R::Draft) -> GatewayResult<R>;

    /// Shallow-merges `patch` into the stored record.
    async fn update(&self, id: i64, patch: R::Patch) -> GatewayResult<R>;

    async fn delete(&self, id: i64) -> GatewayResult<DeleteResponse>;

    /// Receiver for change events on this resource.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}

/// Application-specific gateway operations.
#[async_trait::async_trait]
pub trait ApplicationGateway: ResourceGateway<Application> {
    /// Moves an application to `status`, recording `note` (or a default
    /// note) on its timeline.
    async fn update_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        note: Option<String>,
    ) -> GatewayResult<Application> {
        self.update(id, UpdateApplicationRequest::status(status, note))
            .await
    }
}

/// Commission-specific gateway operations.
#[async_trait::async_trait]
pub trait CommissionGateway: ResourceGateway<Commission> {
    async fn update_status(&self, id: i64, status: CommissionStatus) -> GatewayResult<Commission> {
        self.update(id, UpdateCommissionRequest::status(status)).await
    }
}

/// Document review operations.
#[async_trait::async_trait]
pub trait DocumentGateway: ResourceGateway<Document> {
    /// Approves or rejects a document. `reason` is kept on rejection.
    async fn update_status(
        &self,
        id: i64,
        status: DocumentStatus,
        reason: Option<String>,
    ) -> GatewayResult<Document> {
        self.update(id, UpdateDocumentRequest::status(status, reason))
            .await
    }
}

#[async_trait::async_trait]
pub trait AppointmentGateway: ResourceGateway<Appointment> {
    async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
        notes: Option<String>,
    ) -> GatewayResult<Appointment> {
        self.update(id, UpdateAppointmentRequest::status(status, notes))
            .await
    }
}

/// Payment-specific gateway operations.
#[async_trait::async_trait]
pub trait PaymentGateway: ResourceGateway<Payment> {
    /// Records a completed refund against payment `id` and returns the
    /// new refund record.
    async fn process_refund(&self, id: i64, refund: RefundRequest) -> GatewayResult<Payment>;
}
