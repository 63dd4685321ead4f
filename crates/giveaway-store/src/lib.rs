//! # giveaway-store
//!
//! Persistence for the giveaway service: the `registrants` table and the
//! operations the rest of the system is allowed to perform on it. Uniqueness
//! of email, phone, and link is enforced by the store's UNIQUE constraints,
//! not by application-level checks, so concurrent inserts cannot slip a
//! duplicate past the lookup.

pub mod error;
pub mod model;
pub mod store;

pub use error::StoreError;
pub use model::{NewRegistrant, Registrant};
pub use store::RegistrantStore;
