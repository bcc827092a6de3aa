// Mock payment gateway
//
// Simulates a card charge with a fixed delay and a 90% success probability.
// No real gateway integration exists; declines are terminal and are never
// retried automatically.

use rand::Rng;
use rust_decimal::Decimal;
use std::time::Duration;
use uuid::Uuid;

const GATEWAY_DELAY: Duration = Duration::from_secs(2);
const SUCCESS_PROBABILITY: f64 = 0.9;

/// Outcome of a charge attempt
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub success: bool,
    pub transaction_id: Option<String>,
}

/// The simulated gateway
#[derive(Debug, Clone)]
pub struct PaymentGateway {
    delay: Duration,
    success_probability: f64,
}

impl PaymentGateway {
    /// Gateway with production-like behavior: 2s delay, 90% success
    pub fn new() -> Self {
        Self {
            delay: GATEWAY_DELAY,
            success_probability: SUCCESS_PROBABILITY,
        }
    }

    /// Gateway with explicit behavior, for tests
    pub fn with_behavior(delay: Duration, success_probability: f64) -> Self {
        Self {
            delay,
            success_probability,
        }
    }

    /// Charge an amount. Free orders (amount 0) always succeed without a
    /// transaction id; anything else goes through the simulated gateway.
    pub async fn charge(&self, amount: Decimal) -> PaymentOutcome {
        if amount <= Decimal::ZERO {
            return PaymentOutcome {
                success: true,
                transaction_id: None,
            };
        }

        tokio::time::sleep(self.delay).await;

        let success = rand::thread_rng().gen_bool(self.success_probability);

        if success {
            let transaction_id = Uuid::new_v4().to_string();
            tracing::info!("Payment of {} accepted, transaction {}", amount, transaction_id);
            PaymentOutcome {
                success: true,
                transaction_id: Some(transaction_id),
            }
        } else {
            tracing::warn!("Payment of {} declined by gateway", amount);
            PaymentOutcome {
                success: false,
                transaction_id: None,
            }
        }
    }
}

impl Default for PaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_always_succeeding_gateway() {
        let gateway = PaymentGateway::with_behavior(Duration::ZERO, 1.0);

        let outcome = gateway.charge(dec!(1200)).await;

        assert!(outcome.success);
        assert!(outcome.transaction_id.is_some());
    }

    #[tokio::test]
    async fn test_always_declining_gateway() {
        let gateway = PaymentGateway::with_behavior(Duration::ZERO, 0.0);

        let outcome = gateway.charge(dec!(1200)).await;

        assert!(!outcome.success);
        assert!(outcome.transaction_id.is_none());
    }

    #[tokio::test]
    async fn test_zero_amount_skips_gateway() {
        // Even a gateway that always declines accepts a free order
        let gateway = PaymentGateway::with_behavior(Duration::ZERO, 0.0);

        let outcome = gateway.charge(Decimal::ZERO).await;

        assert!(outcome.success);
        assert!(outcome.transaction_id.is_none());
    }
}
