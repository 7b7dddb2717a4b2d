//! Payment list intents.

use domain::models::payment::RefundRequest;
use domain::models::Payment;
use domain::services::PaymentGateway;
use validator::Validate;

use super::list::ResourceListController;
use crate::error::AdminError;

pub type PaymentListController = ResourceListController<Payment, dyn PaymentGateway>;

impl<G> ResourceListController<Payment, G>
where
    G: PaymentGateway + ?Sized,
{
    /// Refunds part or all of payment `id`. The refund is a new record and
    /// joins the page like a created one.
    pub async fn process_refund(
        &self,
        id: i64,
        refund: RefundRequest,
    ) -> Result<Payment, AdminError> {
        refund.validate()?;
        match self.gateway().process_refund(id, refund).await {
            Ok(record) => {
                self.apply_created(record.clone()).await;
                Ok(record)
            }
            Err(err) => Err(self.fail_mutation(err).await),
        }
    }
}
