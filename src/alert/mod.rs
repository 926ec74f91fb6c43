//! Alert Module
//!
//! The alert record and its collaborators.
//!
//! ## Responsibilities
//! - Alert record data model and flag bits
//! - User/group name resolution behind an injected resolver
//! - Alert type id ↔ name table

mod record;
mod identity;
mod types;

pub use record::{Alert, AlertFlags, Level, ALERT_TYPE_NULL};
pub use identity::{current_uid, IdentityResolver, SystemIdentities};
pub use types::AlertTypeMap;
