use crate::orders::OrderStatus;

/// Service for managing order status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Preparing, Cancelled
    /// - Preparing → Ready, Cancelled
    /// - Ready → Completed, Cancelled
    /// - Completed → Cancelled (refund scenario)
    /// - Cancelled → (no transitions allowed except to itself)
    /// - Any status → Same status (idempotent)
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        // Same status is always valid (idempotent)
        if from == to {
            return true;
        }

        match (from, to) {
            (OrderStatus::Pending, OrderStatus::Preparing) => true,
            (OrderStatus::Pending, OrderStatus::Cancelled) => true,

            (OrderStatus::Preparing, OrderStatus::Ready) => true,
            (OrderStatus::Preparing, OrderStatus::Cancelled) => true,

            (OrderStatus::Ready, OrderStatus::Completed) => true,
            (OrderStatus::Ready, OrderStatus::Cancelled) => true,

            (OrderStatus::Completed, OrderStatus::Cancelled) => true,

            // From Cancelled - no transitions allowed (except to itself, handled above)
            (OrderStatus::Cancelled, _) => false,

            _ => false,
        }
    }

    /// Attempt to transition from one status to another
    ///
    /// # Returns
    /// `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(from: OrderStatus, to: OrderStatus) -> Result<OrderStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Preparing
        ));
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Preparing,
            OrderStatus::Ready
        ));
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Ready,
            OrderStatus::Completed
        ));
    }

    #[test]
    fn test_cancellation_from_active_states() {
        for from in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
        ] {
            assert!(StatusMachine::is_valid_transition(from, OrderStatus::Cancelled));
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        for to in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
        ] {
            assert!(!StatusMachine::is_valid_transition(OrderStatus::Cancelled, to));
        }
    }

    #[test]
    fn test_same_status_is_idempotent() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(StatusMachine::is_valid_transition(status, status));
        }
    }

    #[test]
    fn test_no_skipping_forward() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Ready
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Completed
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Preparing,
            OrderStatus::Completed
        ));
    }

    #[test]
    fn test_no_moving_backward() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Ready,
            OrderStatus::Preparing
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Completed,
            OrderStatus::Pending
        ));
    }

    #[test]
    fn test_transition_returns_error_message() {
        let result = StatusMachine::transition(OrderStatus::Cancelled, OrderStatus::Pending);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("cancelled"));
    }
}
