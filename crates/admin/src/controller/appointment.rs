//! Appointment oversight intents.

use domain::models::{Appointment, AppointmentStatus};
use domain::services::AppointmentGateway;

use super::list::ResourceListController;
use crate::error::AdminError;

pub type AppointmentListController = ResourceListController<Appointment, dyn AppointmentGateway>;

impl<G> ResourceListController<Appointment, G>
where
    G: AppointmentGateway + ?Sized,
{
    /// Moves an appointment to `status`. Given `notes` replace the stored
    /// notes.
    pub async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
        notes: Option<String>,
    ) -> Result<Appointment, AdminError> {
        match self.gateway().update_status(id, status, notes).await {
            Ok(appointment) => {
                self.apply_updated(appointment.clone()).await;
                Ok(appointment)
            }
            Err(err) => Err(self.fail_mutation(err).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaginationConfig;
    use chrono::NaiveDate;
    use domain::models::appointment::CreateAppointmentRequest;
    use domain::models::AppointmentKind;
    use persistence::{FixtureGateway, FixtureSet, LatencyConfig};
    use std::sync::Arc;

    fn controller() -> AppointmentListController {
        let set = FixtureSet::load().unwrap();
        let gateway: Arc<dyn AppointmentGateway> = Arc::new(FixtureGateway::seeded(
            set.appointments,
            LatencyConfig::disabled(),
        ));
        ResourceListController::new(gateway, &PaginationConfig::default())
    }

    #[tokio::test]
    async fn test_approve_moves_summary() {
        let controller = controller();
        controller.load().await.unwrap();
        let before = controller.snapshot().await.summary;

        let approved = controller
            .update_status(4, AppointmentStatus::Approved, None)
            .await
            .unwrap();
        assert_eq!(approved.approved_by.as_deref(), Some("Admin User"));
        assert_eq!(approved.notes.as_deref(), Some("Prefers an afternoon slot"));

        let state = controller.snapshot().await;
        assert_eq!(state.summary.pending, before.pending - 1);
        assert_eq!(state.summary.approved, before.approved + 1);
    }

    #[tokio::test]
    async fn test_booking_joins_pending_filter() {
        let controller = controller();
        controller.set_filter("status", "pending").await.unwrap();

        let booked = controller
            .create(CreateAppointmentRequest {
                student_id: 7,
                student_name: "Nguyen Thi Lan".to_string(),
                agent_id: 2,
                agent_name: "Rahul Verma".to_string(),
                kind: AppointmentKind::DocumentReview,
                date: NaiveDate::from_ymd_opt(2024, 4, 9).unwrap(),
                time: "10:45".to_string(),
                notes: None,
            })
            .await
            .unwrap();

        let state = controller.snapshot().await;
        assert_eq!(state.items.last(), Some(&booked));
        assert_eq!(state.summary.pending, 3);
    }

    #[tokio::test]
    async fn test_booking_with_bad_time_never_reaches_gateway() {
        let controller = controller();
        let err = controller
            .create(CreateAppointmentRequest {
                student_id: 7,
                student_name: "Nguyen Thi Lan".to_string(),
                agent_id: 2,
                agent_name: "Rahul Verma".to_string(),
                kind: AppointmentKind::Consultation,
                date: NaiveDate::from_ymd_opt(2024, 4, 9).unwrap(),
                time: "25:00".to_string(),
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Validation { .. }));
    }
}
