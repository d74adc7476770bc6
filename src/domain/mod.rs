//! Domain model exposed by the user directory service layer.

pub mod query;
pub mod role;
pub mod types;
pub mod user;
