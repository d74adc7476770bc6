//! Mock directory implementation for isolating services in tests.

use mockall::mock;

use crate::directory::errors::DirectoryResult;
use crate::directory::{RoleWriter, UserReader, UserSearchQuery, UserWriter};
use crate::domain::role::Role;
use crate::domain::types::{Password, UserId};
use crate::domain::user::{NewUser, User};

mock! {
    pub Directory {}

    impl UserReader for Directory {
        fn list_all_users(&self) -> DirectoryResult<Vec<User>>;
        fn get_user_by_id(&self, id: &UserId) -> DirectoryResult<User>;
        fn get_user_by_email(&self, email: &str) -> DirectoryResult<User>;
        fn search_users(&self, query: &UserSearchQuery) -> DirectoryResult<Vec<User>>;
        fn count_users(&self, query: &UserSearchQuery) -> DirectoryResult<usize>;
    }

    impl UserWriter for Directory {
        fn create_user(&self, new_user: &NewUser, password: &Password) -> DirectoryResult<User>;
        fn update_user(&self, user: &User) -> DirectoryResult<User>;
        fn delete_user(&self, id: &UserId) -> DirectoryResult<()>;
        fn reset_password(&self, id: &UserId, password: &Password) -> DirectoryResult<()>;
        fn set_user_enabled(&self, id: &UserId, enabled: bool) -> DirectoryResult<()>;
    }

    impl RoleWriter for Directory {
        fn assign_role(&self, id: &UserId, role: Role) -> DirectoryResult<()>;
        fn remove_role(&self, id: &UserId, role: Role) -> DirectoryResult<()>;
    }
}
