//! Query-string DTOs of the `/api/users` endpoints.

use serde::Deserialize;

use crate::domain::query::{SortField, SortOrder, UserQuery};
use crate::domain::types::TypeConstraintError;

/// Query parameters of `GET /api/users`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersQueryParams {
    /// 1-based page number, defaults to 1. Values below 1 select the first page.
    pub page: Option<i64>,
    /// Negative sizes are treated as 0.
    pub size: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    /// Role filter; names outside the known set disable the filter.
    pub role_str: Option<String>,
    pub enabled: Option<bool>,
}

impl TryFrom<UsersQueryParams> for UserQuery {
    type Error = TypeConstraintError;

    fn try_from(params: UsersQueryParams) -> Result<Self, Self::Error> {
        let sort_by = match params.sort_by.as_deref() {
            Some(field) => field.parse()?,
            None => SortField::default(),
        };
        let sort_order = match params.sort_order.as_deref() {
            Some(order) => order.parse()?,
            None => SortOrder::default(),
        };

        let page = params.page.map_or(1, |page| clamp_to_usize(page.max(1)));
        let size = params
            .size
            .map_or(UserQuery::DEFAULT_PAGE_SIZE, |size| clamp_to_usize(size.max(0)));

        let mut query = UserQuery::new(page, size).sort(sort_by, sort_order);

        if let Some(search) = params.search {
            query = query.search(search);
        }
        if let Some(role) = params.role_str.as_deref().map(str::trim)
            && !role.is_empty()
        {
            query = query.role(role);
        }
        if let Some(enabled) = params.enabled {
            query = query.enabled(enabled);
        }

        Ok(query)
    }
}

fn clamp_to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Query parameters of `GET /api/users/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::role::{Role, RoleName};

    #[test]
    fn defaults_match_the_public_contract() {
        let query = UserQuery::try_from(UsersQueryParams::default()).unwrap();

        assert_eq!(query, UserQuery::new(1, 10));
        assert_eq!(query.sort_by, SortField::Username);
        assert_eq!(query.sort_order, SortOrder::Asc);
    }

    #[test]
    fn parses_every_parameter() {
        let params: UsersQueryParams = serde_json::from_value(serde_json::json!({
            "page": 2,
            "size": 5,
            "search": " jo ",
            "sortBy": "lastName",
            "sortOrder": "DESC",
            "roleStr": "admin",
            "enabled": false,
        }))
        .unwrap();

        let query = UserQuery::try_from(params).unwrap();

        assert_eq!(query.page, 2);
        assert_eq!(query.size, 5);
        assert_eq!(query.search.as_deref(), Some("jo"));
        assert_eq!(query.sort_by, SortField::LastName);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.role, Some(RoleName::Known(Role::Admin)));
        assert_eq!(query.enabled, Some(false));
    }

    #[test]
    fn pages_below_one_select_the_first_page() {
        for page in [0, -1, i64::MIN] {
            let params = UsersQueryParams {
                page: Some(page),
                size: Some(5),
                ..UsersQueryParams::default()
            };
            assert_eq!(UserQuery::try_from(params).unwrap().page, 1);
        }
    }

    #[test]
    fn negative_size_is_an_empty_page() {
        let params = UsersQueryParams {
            size: Some(-3),
            ..UsersQueryParams::default()
        };
        assert_eq!(UserQuery::try_from(params).unwrap().size, 0);
    }

    #[test]
    fn blank_role_means_no_filter() {
        let params = UsersQueryParams {
            role_str: Some("  ".to_string()),
            ..UsersQueryParams::default()
        };

        assert_eq!(UserQuery::try_from(params).unwrap().role, None);
    }

    #[test]
    fn rejects_unknown_sort_parameters() {
        let params = UsersQueryParams {
            sort_by: Some("password".to_string()),
            ..UsersQueryParams::default()
        };
        assert_eq!(
            UserQuery::try_from(params),
            Err(TypeConstraintError::InvalidSortField("password".to_string()))
        );

        let params = UsersQueryParams {
            sort_order: Some("sideways".to_string()),
            ..UsersQueryParams::default()
        };
        assert!(UserQuery::try_from(params).is_err());
    }
}
