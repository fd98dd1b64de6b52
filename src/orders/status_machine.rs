use crate::orders::OrderStatus;

/// Service for managing order status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Arguments
    /// * `from` - Current order status
    /// * `to` - Desired new status
    ///
    /// # Valid Transitions
    /// - Pending → Paid, Cancelled
    /// - Paid → Fulfilled, Cancelled (refund scenario)
    /// - Fulfilled, Cancelled → (terminal)
    /// - Any status → Same status (idempotent)
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        if from == to {
            return true;
        }

        match (from, to) {
            (OrderStatus::Pending, OrderStatus::Paid) => true,
            (OrderStatus::Pending, OrderStatus::Cancelled) => true,

            (OrderStatus::Paid, OrderStatus::Fulfilled) => true,
            (OrderStatus::Paid, OrderStatus::Cancelled) => true,

            (OrderStatus::Fulfilled, _) => false,
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
    fn test_pending_to_paid() {
        assert!(StatusMachine::is_valid_transition(OrderStatus::Pending, OrderStatus::Paid));
    }

    #[test]
    fn test_pending_to_cancelled() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Cancelled
        ));
    }

    #[test]
    fn test_paid_to_fulfilled() {
        assert!(StatusMachine::is_valid_transition(OrderStatus::Paid, OrderStatus::Fulfilled));
    }

    #[test]
    fn test_paid_to_cancelled() {
        assert!(StatusMachine::is_valid_transition(OrderStatus::Paid, OrderStatus::Cancelled));
    }

    #[test]
    fn test_pending_cannot_skip_to_fulfilled() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Fulfilled
        ));
    }

    #[test]
    fn test_paid_back_to_pending() {
        assert!(!StatusMachine::is_valid_transition(OrderStatus::Paid, OrderStatus::Pending));
    }

    #[test]
    fn test_fulfilled_is_terminal() {
        for to in [OrderStatus::Pending, OrderStatus::Paid, OrderStatus::Cancelled] {
            assert!(!StatusMachine::is_valid_transition(OrderStatus::Fulfilled, to));
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        for to in [OrderStatus::Pending, OrderStatus::Paid, OrderStatus::Fulfilled] {
            assert!(!StatusMachine::is_valid_transition(OrderStatus::Cancelled, to));
        }
    }

    #[test]
    fn test_same_status_paid() {
        assert!(StatusMachine::is_valid_transition(OrderStatus::Paid, OrderStatus::Paid));
    }

    #[test]
    fn test_transition_valid() {
        assert_eq!(
            StatusMachine::transition(OrderStatus::Pending, OrderStatus::Paid),
            Ok(OrderStatus::Paid)
        );
    }

    #[test]
    fn test_transition_invalid() {
        let result = StatusMachine::transition(OrderStatus::Cancelled, OrderStatus::Paid);
        assert!(result.unwrap_err().contains("Invalid status transition"));
    }
}
