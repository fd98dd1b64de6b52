use crate::quotes::QuoteStatus;

/// Lifecycle rules for quotes
pub struct QuoteStatusMachine;

impl QuoteStatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → UnderReview, Rejected
    /// - UnderReview → Accepted, Rejected
    /// - Accepted, Rejected → (terminal)
    /// - Any status → Same status (idempotent)
    pub fn is_valid_transition(from: QuoteStatus, to: QuoteStatus) -> bool {
        if from == to {
            return true;
        }

        matches!(
            (from, to),
            (QuoteStatus::Pending, QuoteStatus::UnderReview)
                | (QuoteStatus::Pending, QuoteStatus::Rejected)
                | (QuoteStatus::UnderReview, QuoteStatus::Accepted)
                | (QuoteStatus::UnderReview, QuoteStatus::Rejected)
        )
    }

    /// Attempt to transition from one status to another
    ///
    /// # Returns
    /// `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(from: QuoteStatus, to: QuoteStatus) -> Result<QuoteStatus, String> {
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
    fn test_pending_to_under_review() {
        assert!(QuoteStatusMachine::is_valid_transition(
            QuoteStatus::Pending,
            QuoteStatus::UnderReview
        ));
    }

    #[test]
    fn test_pending_to_rejected() {
        assert!(QuoteStatusMachine::is_valid_transition(
            QuoteStatus::Pending,
            QuoteStatus::Rejected
        ));
    }

    #[test]
    fn test_pending_cannot_skip_to_accepted() {
        assert!(!QuoteStatusMachine::is_valid_transition(
            QuoteStatus::Pending,
            QuoteStatus::Accepted
        ));
    }

    #[test]
    fn test_under_review_outcomes() {
        assert!(QuoteStatusMachine::is_valid_transition(
            QuoteStatus::UnderReview,
            QuoteStatus::Accepted
        ));
        assert!(QuoteStatusMachine::is_valid_transition(
            QuoteStatus::UnderReview,
            QuoteStatus::Rejected
        ));
    }

    #[test]
    fn test_under_review_back_to_pending() {
        assert!(!QuoteStatusMachine::is_valid_transition(
            QuoteStatus::UnderReview,
            QuoteStatus::Pending
        ));
    }

    #[test]
    fn test_accepted_is_terminal() {
        for to in [QuoteStatus::Pending, QuoteStatus::UnderReview, QuoteStatus::Rejected] {
            assert!(!QuoteStatusMachine::is_valid_transition(QuoteStatus::Accepted, to));
        }
    }

    #[test]
    fn test_rejected_is_terminal() {
        for to in [QuoteStatus::Pending, QuoteStatus::UnderReview, QuoteStatus::Accepted] {
            assert!(!QuoteStatusMachine::is_valid_transition(QuoteStatus::Rejected, to));
        }
    }

    #[test]
    fn test_same_status_under_review() {
        assert!(QuoteStatusMachine::is_valid_transition(
            QuoteStatus::UnderReview,
            QuoteStatus::UnderReview
        ));
    }

    #[test]
    fn test_transition_invalid() {
        let result = QuoteStatusMachine::transition(QuoteStatus::Accepted, QuoteStatus::UnderReview);
        assert!(result.unwrap_err().contains("accepted to under_review"));
    }
}
