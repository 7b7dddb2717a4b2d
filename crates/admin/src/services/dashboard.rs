//! Dashboard overview service.
//!
//! Aggregates headline statistics across every resource gateway. Each
//! gateway is asked for a one-item page; the summary that comes back
//! covers the full match set, so no records are transferred.

use std::sync::Arc;

use domain::models::{Application, Commission, DashboardOverview, Payment, University, User};
use domain::resource::{ListQuery, Resource};
use domain::services::{
    ApplicationGateway, CommissionGateway, GatewayResult, PaymentGateway, ResourceGateway,
};
use shared::pagination::PageRequest;
use tracing::{debug, info};

use crate::error::AdminError;

/// Summary-only query with no filter criteria.
fn summary_query<R: Resource>() -> ListQuery<R::Filter> {
    ListQuery::new(R::Filter::default(), PageRequest::first(1))
}

async fn summary_of<R, G>(gateway: &G) -> GatewayResult<R::Summary>
where
    R: Resource,
    G: ResourceGateway<R> + ?Sized,
{
    let page = gateway.list(summary_query::<R>()).await?;
    debug!(resource = R::NAME, total = page.page.total, "Collected summary");
    Ok(page.summary)
}

/// Cross-resource overview service.
#[derive(Clone)]
pub struct DashboardService {
    users: Arc<dyn ResourceGateway<User>>,
    universities: Arc<dyn ResourceGateway<University>>,
    applications: Arc<dyn ApplicationGateway>,
    commissions: Arc<dyn CommissionGateway>,
    payments: Arc<dyn PaymentGateway>,
}

impl DashboardService {
    pub fn new(
        users: Arc<dyn ResourceGateway<User>>,
        universities: Arc<dyn ResourceGateway<University>>,
        applications: Arc<dyn ApplicationGateway>,
        commissions: Arc<dyn CommissionGateway>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            users,
            universities,
            applications,
            commissions,
            payments,
        }
    }

    /// Collects every summary concurrently and folds them into one overview.
    pub async fn overview(&self) -> Result<DashboardOverview, AdminError> {
        let (users, universities, applications, commissions, payments) = tokio::try_join!(
            summary_of::<User, _>(self.users.as_ref()),
            summary_of::<University, _>(self.universities.as_ref()),
            summary_of::<Application, _>(self.applications.as_ref()),
            summary_of::<Commission, _>(self.commissions.as_ref()),
            summary_of::<Payment, _>(self.payments.as_ref()),
        )?;

        let overview = DashboardOverview::from_summaries(
            &users,
            &universities,
            &applications,
            &commissions,
            &payments,
        );

        info!(
            students = overview.total_students,
            applications = overview.total_applications,
            revenue = overview.total_revenue,
            "Dashboard overview generated"
        );
        Ok(overview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistence::{FixtureGateway, FixtureSet, LatencyConfig};

    fn service() -> DashboardService {
        let set = FixtureSet::load().unwrap();
        let latency = LatencyConfig::disabled();
        DashboardService::new(
            Arc::new(FixtureGateway::seeded(set.users, latency.clone())),
            Arc::new(FixtureGateway::seeded(set.universities, latency.clone())),
            Arc::new(FixtureGateway::seeded(set.applications, latency.clone())),
            Arc::new(FixtureGateway::seeded(set.commissions, latency.clone())),
            Arc::new(FixtureGateway::seeded(set.payments, latency)),
        )
    }

    #[tokio::test]
    async fn test_overview_from_fixtures() {
        let overview = service().overview().await.unwrap();
        assert_eq!(overview.total_students, 4);
        assert_eq!(overview.total_applications, 6);
        assert_eq!(overview.total_universities, 6);
        assert_eq!(overview.active_universities, 4);
        assert_eq!(overview.total_revenue, 10550.0);
        assert_eq!(overview.outstanding_commissions, 8140.0);
        assert_eq!(overview.funnel.offers, 2);
        assert_eq!(overview.funnel.admissions, 1);
    }

    #[test]
    fn test_summary_query_asks_for_one_item() {
        let query = summary_query::<User>();
        assert_eq!(query.page, PageRequest::new(1, 1));
        assert_eq!(query.filter, Default::default());
    }
}
