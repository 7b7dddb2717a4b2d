//! Document review intents.

use domain::models::{Document, DocumentStatus};
use domain::services::DocumentGateway;

use super::list::ResourceListController;
use crate::error::AdminError;

pub type DocumentListController = ResourceListController<Document, dyn DocumentGateway>;

impl<G> ResourceListController<Document, G>
where
    G: DocumentGateway + ?Sized,
{
    /// Approves or rejects a document. `reason` is kept on rejection.
    pub async fn update_status(
        &self,
        id: i64,
        status: DocumentStatus,
        reason: Option<String>,
    ) -> Result<Document, AdminError> {
        match self.gateway().update_status(id, status, reason).await {
            Ok(document) => {
                self.apply_updated(document.clone()).await;
                Ok(document)
            }
            Err(err) => Err(self.fail_mutation(err).await),
        }
    }
}
