//! The registrant model.

use serde::Serialize;
use sqlx::FromRow;

/// A person who has submitted the registration form. The only persisted
/// entity in the system.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Registrant {
    /// Surrogate key assigned by the store, immutable.
    pub id: i64,
    pub name: String,
    /// Unique across all registrants.
    pub email: String,
    /// Unique across all registrants; 11 or 12 digits.
    pub phone: String,
    /// Full shareable URL, derived at registration, never user-supplied.
    pub link: String,
    /// Times the link was visited. Monotonically non-decreasing.
    pub views: i64,
    /// Referred registrations completed through the link. Monotonically
    /// non-decreasing.
    pub referral_credits: i64,
}

/// Fields for a registrant that has not been persisted yet. Counters start
/// at zero.
#[derive(Debug, Clone)]
pub struct NewRegistrant {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub link: String,
}
