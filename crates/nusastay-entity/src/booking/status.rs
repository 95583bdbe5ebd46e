//! Booking lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a booking in its lifecycle.
///
/// The happy path is a single linear chain; cancellation branches off
/// `pending` and `confirmed` only:
///
/// ```text
/// pending → confirmed → checked_in → completed
///    └──────────┴→ cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, awaiting operator confirmation.
    Pending,
    /// Confirmed by an operator; blocks availability.
    Confirmed,
    /// Guest has arrived; blocks availability.
    CheckedIn,
    /// Guest has departed. Terminal.
    Completed,
    /// Cancelled by the guest or an operator. Terminal.
    Cancelled,
}

impl BookingStatus {
    /// Whether a transition from `self` to `next` is legal.
    ///
    /// Cancelling an already-cancelled booking is deliberately illegal so
    /// duplicate-cancel bugs surface to the caller instead of being
    /// silently absorbed.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::CheckedIn)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::CheckedIn, Self::Completed)
        )
    }

    /// Whether the booking is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a booking in this status blocks availability.
    ///
    /// Pending bookings never block (they would starve concurrent
    /// requesters) and cancelled bookings never block (the slot is free
    /// again).
    pub fn blocks_availability(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = nusastay_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "checked_in" => Ok(Self::CheckedIn),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(nusastay_core::AppError::validation(format!(
                "Invalid booking status: '{s}'. Expected one of: pending, confirmed, \
                 checked_in, completed, cancelled"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(CheckedIn));
        assert!(CheckedIn.can_transition_to(Completed));
    }

    #[test]
    fn test_cancellation_sources() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!CheckedIn.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        // Duplicate cancel is an error, not a no-op.
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for next in [Pending, Confirmed, CheckedIn, Completed, Cancelled] {
            assert!(!Completed.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Confirmed.is_terminal());
    }

    #[test]
    fn test_only_confirmed_and_checked_in_block_availability() {
        assert!(Confirmed.blocks_availability());
        assert!(CheckedIn.blocks_availability());
        assert!(!Pending.blocks_availability());
        assert!(!Cancelled.blocks_availability());
        assert!(!Completed.blocks_availability());
    }

    #[test]
    fn test_from_str_round_trip() {
        for status in [Pending, Confirmed, CheckedIn, Completed, Cancelled] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("unknown".parse::<BookingStatus>().is_err());
    }
}
