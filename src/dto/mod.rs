//! DTOs bridging HTTP query strings and service inputs.

pub mod users;
