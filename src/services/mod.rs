//! Business operations on directory users.

pub mod errors;
pub mod users;

pub use errors::{ServiceError, ServiceResult};
