//! Parameters of a paginated user listing.

use std::cmp::Reverse;
use std::str::FromStr;

use crate::domain::role::RoleName;
use crate::domain::types::TypeConstraintError;
use crate::domain::user::User;

/// User attribute the listing can be ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Username,
    Email,
    FirstName,
    LastName,
}

impl SortField {
    fn key(self, user: &User) -> Option<String> {
        let value = match self {
            SortField::Username => Some(user.username.as_str()),
            SortField::Email => user.email.as_deref(),
            SortField::FirstName => user.first_name.as_deref(),
            SortField::LastName => user.last_name.as_deref(),
        };
        value.map(str::to_lowercase)
    }
}

impl FromStr for SortField {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "username" => Ok(SortField::Username),
            "email" => Ok(SortField::Email),
            "firstname" | "first_name" => Ok(SortField::FirstName),
            "lastname" | "last_name" => Ok(SortField::LastName),
            _ => Err(TypeConstraintError::InvalidSortField(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(TypeConstraintError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Sorts users in place by `field`, comparing keys case-insensitively.
///
/// The sort is stable in both directions: users with equal keys keep the
/// order in which the directory returned them. Missing values come first in
/// ascending order.
pub fn sort_users(users: &mut [User], field: SortField, order: SortOrder) {
    match order {
        SortOrder::Asc => users.sort_by_cached_key(|user| field.key(user)),
        SortOrder::Desc => users.sort_by_cached_key(|user| Reverse(field.key(user))),
    }
}

/// Query accepted by the paginated user listing.
///
/// `page` is the externally visible, 1-based page number.
#[derive(Clone, Debug, PartialEq)]
pub struct UserQuery {
    pub page: usize,
    pub size: usize,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub role: Option<RoleName>,
    pub enabled: Option<bool>,
}

impl UserQuery {
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            search: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            role: None,
            enabled: None,
        }
    }

    /// Sets the free-text filter; blank input means "match all".
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into().trim().to_string();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }

    pub fn role(mut self, role: impl Into<RoleName>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}
