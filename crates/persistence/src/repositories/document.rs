//! Document gateway operations.

use domain::models::Document;
use domain::services::DocumentGateway;

use super::fixture::FixtureGateway;

impl DocumentGateway for FixtureGateway<Document> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureSet;
    use crate::latency::LatencyConfig;
    use domain::models::document::{DocumentFilter, MANUAL_REVIEWER};
    use domain::models::{DocumentKind, DocumentStatus};
    use domain::resource::ListQuery;
    use domain::services::{GatewayError, ResourceGateway};
    use shared::pagination::PageRequest;

    fn gateway() -> FixtureGateway<Document> {
        let set = FixtureSet::load().unwrap();
        FixtureGateway::seeded(set.documents, LatencyConfig::disabled())
    }

    #[tokio::test]
    async fn test_approve_stamps_manual_review() {
        let gateway = gateway();
        let approved = gateway
            .update_status(2, DocumentStatus::Approved, None)
            .await
            .unwrap();
        assert_eq!(approved.status, DocumentStatus::Approved);
        assert_eq!(approved.verified_by.as_deref(), Some(MANUAL_REVIEWER));
        assert!(approved.verification_date.is_some());
        assert_eq!(gateway.get(2).await.unwrap(), approved);
    }

    #[tokio::test]
    async fn test_reject_stores_reason() {
        let gateway = gateway();
        let rejected = gateway
            .update_status(
                4,
                DocumentStatus::Rejected,
                Some("Statement exceeds word limit".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(
            rejected.rejection_reason.as_deref(),
            Some("Statement exceeds word limit")
        );
        assert!(rejected.verified_by.is_none());
    }

    #[tokio::test]
    async fn test_update_status_missing_document() {
        let err = gateway()
            .update_status(40, DocumentStatus::Approved, None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::NotFound {
                resource: "document",
                id: 40
            }
        );
    }

    #[tokio::test]
    async fn test_list_by_status_and_student() {
        let gateway = gateway();
        let filter = DocumentFilter {
            status: Some(DocumentStatus::Pending),
            student_name: Some("Lucas Oliveira".to_string()),
            ..Default::default()
        };
        let page = gateway
            .list(ListQuery::new(filter, PageRequest::default()))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].kind, DocumentKind::StatementOfPurpose);
        assert_eq!(page.summary.pending, 1);
    }
}
