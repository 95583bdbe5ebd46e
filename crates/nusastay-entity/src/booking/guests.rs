//! Guest composition and contact snapshot.

use serde::{Deserialize, Serialize};

use nusastay_core::{AppError, AppResult};

/// Guest composition of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestBreakdown {
    /// Adult guests (at least one required).
    pub adults: i32,
    /// Children (count toward capacity).
    pub children: i32,
    /// Infants (do not count toward capacity).
    pub infants: i32,
}

impl GuestBreakdown {
    /// Capacity-relevant guest count: adults + children. Infants are
    /// excluded by policy.
    pub fn total_guests(&self) -> i32 {
        self.adults + self.children
    }

    /// Validate the composition: at least one adult, no negative counts.
    pub fn validate(&self) -> AppResult<()> {
        if self.adults < 1 {
            return Err(AppError::validation("At least one adult is required"));
        }
        if self.children < 0 || self.infants < 0 {
            return Err(AppError::validation("Guest counts cannot be negative"));
        }
        Ok(())
    }
}

/// Contact details captured at booking time.
///
/// This is a snapshot: later changes to the user's profile do not touch
/// existing bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestContact {
    /// Guest first name.
    pub first_name: String,
    /// Guest last name.
    pub last_name: String,
    /// Contact email (confirmation messages go here).
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Free-text special requests.
    pub special_requests: Option<String>,
}

impl GuestContact {
    /// Validate that the required contact fields are present.
    pub fn validate(&self) -> AppResult<()> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(AppError::validation("Guest name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(AppError::validation("Guest email is required"));
        }
        if self.phone.trim().is_empty() {
            return Err(AppError::validation("Guest phone is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_excludes_infants() {
        let guests = GuestBreakdown {
            adults: 2,
            children: 1,
            infants: 1,
        };
        assert_eq!(guests.total_guests(), 3);
    }

    #[test]
    fn test_requires_at_least_one_adult() {
        let guests = GuestBreakdown {
            adults: 0,
            children: 2,
            infants: 0,
        };
        assert!(guests.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_counts() {
        let guests = GuestBreakdown {
            adults: 1,
            children: -1,
            infants: 0,
        };
        assert!(guests.validate().is_err());
    }

    #[test]
    fn test_contact_requires_email() {
        let contact = GuestContact {
            first_name: "Made".to_string(),
            last_name: "Wirawan".to_string(),
            email: "  ".to_string(),
            phone: "+62 812 0000".to_string(),
            special_requests: None,
        };
        assert!(contact.validate().is_err());
    }
}
