use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};

use crate::directory::KeycloakDirectory;
use crate::domain::query::UserQuery;
use crate::domain::role::Role;
use crate::dto::users::{SearchParams, UsersQueryParams};
use crate::forms::users::{CreateUserForm, PasswordForm, RoleForm, UpdateUserForm};
use crate::routes::{blocking, error_response, respond};
use crate::services::{ServiceError, users as users_service};

type Directory = web::Data<KeycloakDirectory>;

#[get("/users")]
pub async fn list_users(
    req: HttpRequest,
    params: web::Query<UsersQueryParams>,
    directory: Directory,
) -> impl Responder {
    let query = match UserQuery::try_from(params.into_inner()) {
        Ok(query) => query,
        Err(err) => return error_response(&ServiceError::from(err), &req),
    };

    let result = blocking(move || users_service::get_users_page(directory.get_ref(), query)).await;
    respond(result, &req, |page| {
        HttpResponse::Ok().json(page.into_external())
    })
}

#[get("/users/all")]
pub async fn list_all_users(req: HttpRequest, directory: Directory) -> impl Responder {
    let result = blocking(move || users_service::list_all_users(directory.get_ref())).await;
    respond(result, &req, |users| HttpResponse::Ok().json(users))
}

#[get("/users/admins")]
pub async fn list_admins(req: HttpRequest, directory: Directory) -> impl Responder {
    let result =
        blocking(move || users_service::list_users_by_role(directory.get_ref(), Role::Admin)).await;
    respond(result, &req, |users| HttpResponse::Ok().json(users))
}

#[get("/users/clients")]
pub async fn list_clients(req: HttpRequest, directory: Directory) -> impl Responder {
    let result =
        blocking(move || users_service::list_users_by_role(directory.get_ref(), Role::Client))
            .await;
    respond(result, &req, |users| HttpResponse::Ok().json(users))
}

#[get("/users/search")]
pub async fn search_users(
    req: HttpRequest,
    params: web::Query<SearchParams>,
    directory: Directory,
) -> impl Responder {
    let text = params.into_inner().query;
    let result = blocking(move || users_service::search_users(directory.get_ref(), &text)).await;
    respond(result, &req, |users| HttpResponse::Ok().json(users))
}

#[get("/users/email/{email}")]
pub async fn get_user_by_email(
    req: HttpRequest,
    email: web::Path<String>,
    directory: Directory,
) -> impl Responder {
    let email = email.into_inner();
    let result =
        blocking(move || users_service::get_user_by_email(directory.get_ref(), &email)).await;
    respond(result, &req, |user| HttpResponse::Ok().json(user))
}

#[get("/users/{id}")]
pub async fn get_user(
    req: HttpRequest,
    id: web::Path<String>,
    directory: Directory,
) -> impl Responder {
    let id = id.into_inner();
    let result = blocking(move || users_service::get_user(directory.get_ref(), &id)).await;
    respond(result, &req, |user| HttpResponse::Ok().json(user))
}

#[post("/users")]
pub async fn create_user(
    req: HttpRequest,
    web::Json(form): web::Json<CreateUserForm>,
    directory: Directory,
) -> impl Responder {
    let result = blocking(move || users_service::create_user(directory.get_ref(), form)).await;
    respond(result, &req, |user| HttpResponse::Created().json(user))
}

#[put("/users/{id}")]
pub async fn update_user(
    req: HttpRequest,
    id: web::Path<String>,
    web::Json(form): web::Json<UpdateUserForm>,
    directory: Directory,
) -> impl Responder {
    let id = id.into_inner();
    let result =
        blocking(move || users_service::update_user(directory.get_ref(), &id, form)).await;
    respond(result, &req, |user| HttpResponse::Ok().json(user))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    req: HttpRequest,
    id: web::Path<String>,
    directory: Directory,
) -> impl Responder {
    let id = id.into_inner();
    let result = blocking(move || users_service::delete_user(directory.get_ref(), &id)).await;
    respond(result, &req, |()| HttpResponse::NoContent().finish())
}

#[put("/users/{id}/password")]
pub async fn update_password(
    req: HttpRequest,
    id: web::Path<String>,
    web::Json(form): web::Json<PasswordForm>,
    directory: Directory,
) -> impl Responder {
    let id = id.into_inner();
    let result =
        blocking(move || users_service::update_password(directory.get_ref(), &id, form)).await;
    respond(result, &req, |()| HttpResponse::NoContent().finish())
}

#[put("/users/{id}/enable")]
pub async fn enable_user(
    req: HttpRequest,
    id: web::Path<String>,
    directory: Directory,
) -> impl Responder {
    let id = id.into_inner();
    let result = blocking(move || users_service::enable_user(directory.get_ref(), &id)).await;
    respond(result, &req, |user| HttpResponse::Ok().json(user))
}

#[put("/users/{id}/disable")]
pub async fn disable_user(
    req: HttpRequest,
    id: web::Path<String>,
    directory: Directory,
) -> impl Responder {
    let id = id.into_inner();
    let result = blocking(move || users_service::disable_user(directory.get_ref(), &id)).await;
    respond(result, &req, |user| HttpResponse::Ok().json(user))
}

#[post("/users/{id}/roles")]
pub async fn assign_role(
    req: HttpRequest,
    id: web::Path<String>,
    web::Json(form): web::Json<RoleForm>,
    directory: Directory,
) -> impl Responder {
    let id = id.into_inner();
    let result =
        blocking(move || users_service::assign_role(directory.get_ref(), &id, form)).await;
    respond(result, &req, |user| HttpResponse::Ok().json(user))
}

#[delete("/users/{id}/roles/{role}")]
pub async fn remove_role(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    directory: Directory,
) -> impl Responder {
    let (id, role) = path.into_inner();
    let result =
        blocking(move || users_service::remove_role(directory.get_ref(), &id, &role)).await;
    respond(result, &req, |user| HttpResponse::Ok().json(user))
}
