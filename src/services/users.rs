//! Services backing the `/api/users` endpoints.

use crate::directory::{RoleWriter, UserReader, UserSearchQuery, UserWriter};
use crate::domain::query::{UserQuery, sort_users};
use crate::domain::role::{Role, RoleName};
use crate::domain::types::{Password, UserId};
use crate::domain::user::{User, UserPatch};
use crate::forms::users::{
    CreateUserForm, CreateUserPayload, PasswordForm, RoleForm, UpdateUserForm, parse_role,
};
use crate::pagination::{Page, to_internal_page};
use crate::services::ServiceResult;

/// Maximum number of users returned by a free-text search.
pub const SEARCH_LIMIT: usize = 100;

/// Returns one page of users matching `query`.
///
/// Role and enabled filters are applied after retrieval, then the result is
/// sorted and sliced. `total_elements` is the directory's count for the text
/// search alone and therefore ignores those filters. The returned page uses
/// 0-based numbering.
pub fn get_users_page<R>(repo: &R, query: UserQuery) -> ServiceResult<Page<User>>
where
    R: UserReader + ?Sized,
{
    let page = to_internal_page(query.page);
    let search = UserSearchQuery::new(query.search);

    let total_elements = repo.count_users(&search)?;
    let mut users = repo.search_users(&search)?;

    match &query.role {
        Some(RoleName::Known(role)) => users.retain(|user| user.has_role(*role)),
        Some(RoleName::Unrecognized(name)) => {
            log::warn!("Ignoring unrecognized role filter: {name}");
        }
        None => {}
    }
    if let Some(enabled) = query.enabled {
        users.retain(|user| user.enabled == enabled);
    }

    sort_users(&mut users, query.sort_by, query.sort_order);

    let content = users
        .into_iter()
        .skip(page.saturating_mul(query.size))
        .take(query.size)
        .collect();

    Ok(Page::new(content, page, query.size, total_elements))
}

pub fn list_all_users<R>(repo: &R) -> ServiceResult<Vec<User>>
where
    R: UserReader + ?Sized,
{
    Ok(repo.list_all_users()?)
}

/// Lists every user holding `role`.
pub fn list_users_by_role<R>(repo: &R, role: Role) -> ServiceResult<Vec<User>>
where
    R: UserReader + ?Sized,
{
    let mut users = repo.list_all_users()?;
    users.retain(|user| user.has_role(role));
    Ok(users)
}

pub fn get_user<R>(repo: &R, id: &str) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    let id = UserId::new(id)?;
    Ok(repo.get_user_by_id(&id)?)
}

pub fn get_user_by_email<R>(repo: &R, email: &str) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    Ok(repo.get_user_by_email(email.trim())?)
}

/// Returns at most [`SEARCH_LIMIT`] users matching the free-text `text`.
pub fn search_users<R>(repo: &R, text: &str) -> ServiceResult<Vec<User>>
where
    R: UserReader + ?Sized,
{
    let query = UserSearchQuery::new(Some(text.to_string())).paginate(0, SEARCH_LIMIT);
    Ok(repo.search_users(&query)?)
}

/// Validates the form and creates the user.
///
/// Invalid input is rejected before the directory is contacted.
pub fn create_user<R>(repo: &R, form: CreateUserForm) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let payload = CreateUserPayload::try_from(form)?;

    let user = repo
        .create_user(&payload.new_user, &payload.password)
        .inspect_err(|err| {
            log::error!("Failed to create user {}: {err}", payload.new_user.username);
        })?;

    log::info!("User {} created with role {}", user.username, payload.new_user.role);
    Ok(user)
}

/// Applies the supplied fields of `form` to the stored user.
pub fn update_user<R>(repo: &R, id: &str, form: UpdateUserForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let id = UserId::new(id)?;
    let patch = UserPatch::try_from(form)?;

    let mut user = repo.get_user_by_id(&id)?;
    user.apply(patch);

    let updated = repo.update_user(&user).inspect_err(|err| {
        log::error!("Failed to update user {id}: {err}");
    })?;
    Ok(updated)
}

pub fn delete_user<R>(repo: &R, id: &str) -> ServiceResult<()>
where
    R: UserWriter + ?Sized,
{
    let id = UserId::new(id)?;
    repo.delete_user(&id)?;
    log::info!("User {id} deleted");
    Ok(())
}

pub fn update_password<R>(repo: &R, id: &str, form: PasswordForm) -> ServiceResult<()>
where
    R: UserWriter + ?Sized,
{
    let id = UserId::new(id)?;
    let password = Password::try_from(form)?;
    repo.reset_password(&id, &password)?;
    Ok(())
}

pub fn enable_user<R>(repo: &R, id: &str) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    set_enabled(repo, id, true)
}

pub fn disable_user<R>(repo: &R, id: &str) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    set_enabled(repo, id, false)
}

fn set_enabled<R>(repo: &R, id: &str, enabled: bool) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let id = UserId::new(id)?;
    repo.set_user_enabled(&id, enabled)?;
    Ok(repo.get_user_by_id(&id)?)
}

/// Grants the role named in `form` and returns the refreshed user.
pub fn assign_role<R>(repo: &R, id: &str, form: RoleForm) -> ServiceResult<User>
where
    R: UserReader + RoleWriter + ?Sized,
{
    let id = UserId::new(id)?;
    let role = Role::try_from(form)?;
    repo.assign_role(&id, role)?;
    Ok(repo.get_user_by_id(&id)?)
}

/// Revokes `role` and returns the refreshed user.
pub fn remove_role<R>(repo: &R, id: &str, role: &str) -> ServiceResult<User>
where
    R: UserReader + RoleWriter + ?Sized,
{
    let id = UserId::new(id)?;
    let role = parse_role(role)?;
    repo.remove_role(&id, role)?;
    Ok(repo.get_user_by_id(&id)?)
}
