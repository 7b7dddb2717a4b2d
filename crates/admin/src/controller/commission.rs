//! Commission list intents.

use domain::models::{Commission, CommissionStatus};
use domain::services::CommissionGateway;

use super::list::ResourceListController;
use crate::error::AdminError;

pub type CommissionListController = ResourceListController<Commission, dyn CommissionGateway>;

impl<G> ResourceListController<Commission, G>
where
    G: CommissionGateway + ?Sized,
{
    /// Moves a commission to `status`. The first move into paid stamps the
    /// paid date.
    pub async fn update_status(
        &self,
        id: i64,
        status: CommissionStatus,
    ) -> Result<Commission, AdminError> {
        match self.gateway().update_status(id, status).await {
            Ok(commission) => {
                self.apply_updated(commission.clone()).await;
                Ok(commission)
            }
            Err(err) => Err(self.fail_mutation(err).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaginationConfig;
    use persistence::{FixtureGateway, FixtureSet, LatencyConfig};
    use std::sync::Arc;

    fn controller() -> CommissionListController {
        let set = FixtureSet::load().unwrap();
        let gateway: Arc<dyn CommissionGateway> = Arc::new(FixtureGateway::seeded(
            set.commissions,
            LatencyConfig::disabled(),
        ));
        ResourceListController::new(gateway, &PaginationConfig::default())
    }

    #[tokio::test]
    async fn test_mark_paid_moves_amounts() {
        let controller = controller();
        controller.load().await.unwrap();
        let before = controller.snapshot().await.summary;
        assert_eq!(before.paid_amount, 5700.0);

        let paid = controller
            .update_status(2, CommissionStatus::Paid)
            .await
            .unwrap();
        assert!(paid.paid_date.is_some());

        let after = controller.snapshot().await.summary;
        assert_eq!(after.paid_amount, 8200.0);
        assert_eq!(after.outstanding_amount, before.outstanding_amount - 2500.0);
        assert_eq!(after.total_amount, before.total_amount);
    }

    #[tokio::test]
    async fn test_mark_paid_twice_is_idempotent() {
        let controller = controller();
        let first = controller
            .update_status(4, CommissionStatus::Paid)
            .await
            .unwrap();
        let second = controller
            .update_status(4, CommissionStatus::Paid)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_status_change_leaves_filtered_page() {
        let controller = controller();
        controller.set_filter("status", "pending").await.unwrap();
        assert_eq!(controller.snapshot().await.items.len(), 2);

        controller
            .update_status(2, CommissionStatus::Processing)
            .await
            .unwrap();
        let state = controller.snapshot().await;
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.pagination.total, 1);
        assert_eq!(state.summary.pending, 1);
    }
}
