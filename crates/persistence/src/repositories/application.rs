//! Application gateway operations.

use domain::models::Application;
use domain::services::ApplicationGateway;

use super::fixture::FixtureGateway;

impl ApplicationGateway for FixtureGateway<Application> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureSet;
    use crate::latency::LatencyConfig;
    use domain::models::application::{ApplicationFilter, CreateApplicationRequest};
    use domain::models::ApplicationStatus;
    use domain::resource::ListQuery;
    use domain::services::{GatewayError, ResourceGateway};
    use shared::pagination::PageRequest;

    fn gateway() -> FixtureGateway<Application> {
        let set = FixtureSet::load().unwrap();
        FixtureGateway::seeded(set.applications, LatencyConfig::disabled())
    }

    #[tokio::test]
    async fn test_update_status_appends_timeline() {
        let gateway = gateway();
        let before = gateway.get(1).await.unwrap();
        let updated = gateway
            .update_status(1, ApplicationStatus::UnderReview, None)
            .await
            .unwrap();

        assert_eq!(updated.status, ApplicationStatus::UnderReview);
        assert_eq!(updated.timeline.len(), before.timeline.len() + 1);
        let last = updated.timeline.last().unwrap();
        assert_eq!(last.status, ApplicationStatus::UnderReview);
        assert_eq!(last.note, "Status updated to under_review");
    }

    #[tokio::test]
    async fn test_update_status_keeps_custom_note() {
        let gateway = gateway();
        let updated = gateway
            .update_status(
                2,
                ApplicationStatus::InterviewScheduled,
                Some("Interview on 3 May".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(updated.timeline.last().unwrap().note, "Interview on 3 May");
    }

    #[tokio::test]
    async fn test_update_status_missing_application() {
        let gateway = gateway();
        let err = gateway
            .update_status(404, ApplicationStatus::Admitted, None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::NotFound {
                resource: "application",
                id: 404
            }
        );
    }

    #[tokio::test]
    async fn test_created_application_gets_next_display_code() {
        let gateway = gateway();
        let created = gateway
            .create(CreateApplicationRequest {
                student_id: 8,
                student_name: "Daniel Okafor".to_string(),
                university_id: 1,
                university_name: "University of Manchester".to_string(),
                agent_id: 3,
                agent_name: "Chen Wei".to_string(),
                program: "MSc Robotics".to_string(),
                country: "UK".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 7);
        assert!(created.application_id.ends_with("-007"));
        assert_eq!(created.status, ApplicationStatus::Submitted);
    }

    #[tokio::test]
    async fn test_status_filter_on_seed_data() {
        let gateway = gateway();
        let filter = ApplicationFilter {
            status: Some(ApplicationStatus::Admitted),
            ..Default::default()
        };
        let page = gateway
            .list(ListQuery::new(filter, PageRequest::default()))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].application_id, "APP-2024-003");
    }
}
