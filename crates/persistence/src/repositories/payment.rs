//! Payment gateway operations.

use domain::models::payment::RefundRequest;
use domain::models::Payment;
use domain::services::{GatewayError, GatewayResult, PaymentGateway};
use tracing::info;

use super::fixture::{today, FixtureGateway};
use crate::latency::Operation;

#[async_trait::async_trait]
impl PaymentGateway for FixtureGateway<Payment> {
    async fn process_refund(&self, id: i64, refund: RefundRequest) -> GatewayResult<Payment> {
        let timer = self.begin(Operation::Create).await;
        let Some(original) = self.store().get(id).await else {
            timer.record();
            return Err(GatewayError::not_found::<Payment>(id));
        };

        let today = today();
        let record = self
            .store()
            .insert_with(|new_id| original.refund(new_id, refund, today))
            .await;
        timer.record();

        info!(
            payment_id = id,
            refund_id = record.id,
            amount = record.amount,
            "Processed refund"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureSet;
    use crate::latency::LatencyConfig;
    use domain::models::{PaymentKind, PaymentStatus};
    use domain::services::ResourceGateway;
    use tokio_test::assert_err;

    fn gateway() -> FixtureGateway<Payment> {
        let set = FixtureSet::load().unwrap();
        FixtureGateway::seeded(set.payments, LatencyConfig::disabled())
    }

    #[tokio::test]
    async fn test_refund_creates_completed_negative_record() {
        let gateway = gateway();
        let refund = gateway
            .process_refund(
                1,
                RefundRequest {
                    amount: 150.0,
                    reason: "Withdrawn before review".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(refund.id, 7);
        assert_eq!(refund.amount, -150.0);
        assert_eq!(refund.kind, PaymentKind::Refund);
        assert_eq!(refund.status, PaymentStatus::Completed);
        assert_eq!(refund.transaction_id, "REF-TXN-2024-0001");
        assert_eq!(refund.reference, "REF-INV-2024-001");
        assert_eq!(refund.refund_reason.as_deref(), Some("Withdrawn before review"));
        assert_eq!(gateway.get(7).await.unwrap(), refund);
    }

    #[tokio::test]
    async fn test_refund_of_missing_payment() {
        let gateway = gateway();
        let result = gateway
            .process_refund(
                99,
                RefundRequest {
                    amount: 10.0,
                    reason: "n/a".to_string(),
                },
            )
            .await;
        assert_eq!(
            assert_err!(result),
            GatewayError::NotFound {
                resource: "payment",
                id: 99
            }
        );
        assert_eq!(gateway.store().len().await, 6);
    }
}
