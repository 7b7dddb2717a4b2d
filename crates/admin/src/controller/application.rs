//! Application list intents.

use domain::models::{Application, ApplicationStatus};
use domain::services::ApplicationGateway;

use super::list::ResourceListController;
use crate::error::AdminError;

/// Application list backed by any application gateway.
pub type ApplicationListController = ResourceListController<Application, dyn ApplicationGateway>;

impl<G> ResourceListController<Application, G>
where
    G: ApplicationGateway + ?Sized,
{
    /// Moves an application to `status` and appends a timeline entry.
    pub async fn update_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        note: Option<String>,
    ) -> Result<Application, AdminError> {
        match self.gateway().update_status(id, status, note).await {
            Ok(application) => {
                self.apply_updated(application.clone()).await;
                Ok(application)
            }
            Err(err) => Err(self.fail_mutation(err).await),
        }
    }
}
