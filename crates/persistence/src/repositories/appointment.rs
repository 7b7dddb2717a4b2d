//! Appointment gateway operations.

use domain::models::Appointment;
use domain::services::AppointmentGateway;

use super::fixture::FixtureGateway;

impl AppointmentGateway for FixtureGateway<Appointment> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureSet;
    use crate::latency::LatencyConfig;
    use chrono::NaiveDate;
    use domain::models::appointment::{
        AppointmentFilter, CreateAppointmentRequest, ADMIN_APPROVER,
    };
    use domain::models::{AppointmentKind, AppointmentStatus};
    use domain::resource::ListQuery;
    use domain::services::ResourceGateway;
    use shared::pagination::PageRequest;
    use tokio_test::assert_ok;

    fn gateway() -> FixtureGateway<Appointment> {
        let set = FixtureSet::load().unwrap();
        FixtureGateway::seeded(set.appointments, LatencyConfig::disabled())
    }

    #[tokio::test]
    async fn test_booking_is_pending() {
        let gateway = gateway();
        let booked = assert_ok!(
            gateway
                .create(CreateAppointmentRequest {
                    student_id: 5,
                    student_name: "Aisha Khan".to_string(),
                    agent_id: 2,
                    agent_name: "Rahul Verma".to_string(),
                    kind: AppointmentKind::VisaGuidance,
                    date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
                    time: "13:00".to_string(),
                    notes: None,
                })
                .await
        );
        assert_eq!(booked.id, 6);
        assert_eq!(booked.status, AppointmentStatus::Pending);
        assert!(booked.approved_by.is_none());
    }

    #[tokio::test]
    async fn test_approve_records_approver_and_notes() {
        let gateway = gateway();
        let approved = assert_ok!(
            gateway
                .update_status(
                    3,
                    AppointmentStatus::Approved,
                    Some("Room 2, bring offer letters".to_string()),
                )
                .await
        );
        assert_eq!(approved.approved_by.as_deref(), Some(ADMIN_APPROVER));
        assert!(approved.approved_date.is_some());
        assert_eq!(approved.notes.as_deref(), Some("Room 2, bring offer letters"));
    }

    #[tokio::test]
    async fn test_list_by_type() {
        let gateway = gateway();
        let filter = AppointmentFilter {
            kind: Some(AppointmentKind::Consultation),
            ..Default::default()
        };
        let page = gateway
            .list(ListQuery::new(filter, PageRequest::default()))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.summary.completed, 1);
        assert_eq!(page.summary.cancelled, 1);
    }
}
