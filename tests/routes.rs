use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use httpmock::prelude::*;
use serde_json::json;

mod common;

use common::{TestKeycloak, USERS, call};

fn twelve_users() -> Vec<(String, String)> {
    (0..12)
        .map(|n| (format!("u-{n}"), format!("user{n:02}")))
        .collect()
}

#[test]
fn test_first_page_uses_external_numbering() {
    let keycloak = TestKeycloak::start();
    let users = twelve_users();
    let listing: Vec<_> = users
        .iter()
        .map(|(id, name)| (id.as_str(), name.as_str(), true, "CLIENT"))
        .collect();
    keycloak.mock_listing(&listing);
    keycloak.mock_count(12);

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::get().uri("/api/users?page=1&size=5"),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pageNumber"], 1);
    assert_eq!(body["pageSize"], 5);
    assert_eq!(body["totalElements"], 12);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["first"], true);
    assert_eq!(body["last"], false);
    assert_eq!(body["content"].as_array().unwrap().len(), 5);
    assert_eq!(body["content"][0]["username"], "user00");
    assert_eq!(body["content"][0]["roles"], json!(["CLIENT"]));
}

#[test]
fn test_negative_page_falls_back_to_first_page() {
    let keycloak = TestKeycloak::start();
    keycloak.mock_listing(&[("u-1", "alice", true, "CLIENT")]);
    keycloak.mock_count(1);

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::get().uri("/api/users?page=-1&size=5"),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pageNumber"], 1);
    assert_eq!(body["first"], true);
    assert_eq!(body["content"][0]["username"], "alice");
}

#[test]
fn test_last_page_is_flagged() {
    let keycloak = TestKeycloak::start();
    let users = twelve_users();
    let listing: Vec<_> = users
        .iter()
        .map(|(id, name)| (id.as_str(), name.as_str(), true, "CLIENT"))
        .collect();
    keycloak.mock_listing(&listing);
    keycloak.mock_count(12);

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::get().uri("/api/users?page=3&size=5&sortOrder=asc"),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pageNumber"], 3);
    assert_eq!(body["first"], false);
    assert_eq!(body["last"], true);
    assert_eq!(
        body["content"],
        json!([
            {"id": "u-10", "username": "user10", "email": null, "firstName": null,
             "lastName": null, "enabled": true, "roles": ["CLIENT"]},
            {"id": "u-11", "username": "user11", "email": null, "firstName": null,
             "lastName": null, "enabled": true, "roles": ["CLIENT"]},
        ])
    );
}

#[test]
fn test_role_and_enabled_filters_keep_pre_filter_total() {
    let keycloak = TestKeycloak::start();
    keycloak.mock_listing(&[
        ("u-1", "alice", false, "ADMIN"),
        ("u-2", "bob", true, "ADMIN"),
        ("u-3", "carol", false, "CLIENT"),
        ("u-4", "dave", false, "admin"),
    ]);
    keycloak.mock_count(4);

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::get().uri("/api/users?roleStr=ADMIN&enabled=false"),
    );

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "dave"]);
    assert_eq!(body["totalElements"], 4);
}

#[test]
fn test_invalid_sort_field_is_bad_request() {
    let keycloak = TestKeycloak::start();

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::get().uri("/api/users?sortBy=password"),
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["path"], "/api/users");
}

#[test]
fn test_fixed_paths_take_precedence_over_id() {
    let keycloak = TestKeycloak::start();
    keycloak.mock_listing(&[("u-1", "alice", true, "ADMIN"), ("u-2", "bob", true, "CLIENT")]);
    let by_id = keycloak.server.mock(|when, then| {
        when.method(GET).path(format!("{USERS}/admins"));
        then.status(404);
    });

    let (status, body) = call(&keycloak.directory, TestRequest::get().uri("/api/users/admins"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["username"], "alice");
    assert_eq!(by_id.calls(), 0);

    let (status, body) = call(&keycloak.directory, TestRequest::get().uri("/api/users/all"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[test]
fn test_get_user_by_email() {
    let keycloak = TestKeycloak::start();
    keycloak.server.mock(|when, then| {
        when.method(GET)
            .path(USERS)
            .query_param("email", "alice@example.com")
            .query_param("exact", "true");
        then.status(200).json_body(json!([{
            "id": "u-1",
            "username": "alice",
            "email": "alice@example.com",
            "firstName": "Alice",
            "enabled": true,
        }]));
    });
    keycloak.mock_roles("u-1", &["CLIENT", "offline_access"]);

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::get().uri("/api/users/email/alice@example.com"),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "u-1");
    assert_eq!(body["firstName"], "Alice");
    assert_eq!(body["roles"], json!(["CLIENT"]));
}

#[test]
fn test_delete_missing_user_is_not_found() {
    let keycloak = TestKeycloak::start();
    keycloak.server.mock(|when, then| {
        when.method(DELETE).path(format!("{USERS}/nope"));
        then.status(404);
    });

    let (status, body) = call(&keycloak.directory, TestRequest::delete().uri("/api/users/nope"));

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "USER_NOT_FOUND");
    assert_eq!(body["message"], "User not found with id: nope");
    assert_eq!(body["path"], "/api/users/nope");
}

#[test]
fn test_delete_user_returns_no_content() {
    let keycloak = TestKeycloak::start();
    let delete = keycloak.server.mock(|when, then| {
        when.method(DELETE).path(format!("{USERS}/u-1"));
        then.status(204);
    });

    let (status, body) = call(&keycloak.directory, TestRequest::delete().uri("/api/users/u-1"));

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    delete.assert();
}

#[test]
fn test_create_user_defaults_to_client() {
    let keycloak = TestKeycloak::start();
    let create = keycloak.server.mock(|when, then| {
        when.method(POST).path(USERS);
        then.status(201)
            .header("Location", format!("http://keycloak{USERS}/new-id"));
    });
    keycloak.server.mock(|when, then| {
        when.method(GET).path("/admin/realms/micromall/roles/CLIENT");
        then.status(200).json_body(json!({"id": "r-1", "name": "CLIENT"}));
    });
    let assign = keycloak.server.mock(|when, then| {
        when.method(POST)
            .path(format!("{USERS}/new-id/role-mappings/realm"));
        then.status(204);
    });

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::post().uri("/api/users").set_json(json!({
            "username": "jdoe",
            "email": "JDoe@example.com",
            "password": "s3cret",
        })),
    );

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "new-id");
    assert_eq!(body["email"], "jdoe@example.com");
    assert_eq!(body["enabled"], true);
    assert_eq!(body["roles"], json!(["CLIENT"]));
    create.assert();
    assign.assert();
}

#[test]
fn test_create_user_with_bogus_role_makes_no_remote_call() {
    let keycloak = TestKeycloak::start();
    let create = keycloak.server.mock(|when, then| {
        when.method(POST).path(USERS);
        then.status(201);
    });

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::post().uri("/api/users").set_json(json!({
            "username": "jdoe",
            "password": "s3cret",
            "role": "bogus",
        })),
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid role: bogus");
    assert_eq!(create.calls(), 0);
}

#[test]
fn test_create_user_without_password_is_rejected() {
    let keycloak = TestKeycloak::start();

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"username": "jdoe"})),
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password is required");
}

#[test]
fn test_duplicate_username_is_conflict() {
    let keycloak = TestKeycloak::start();
    keycloak.server.mock(|when, then| {
        when.method(POST).path(USERS);
        then.status(409)
            .json_body(json!({"errorMessage": "User exists with same username"}));
    });

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::post().uri("/api/users").set_json(json!({
            "username": "jdoe",
            "password": "s3cret",
        })),
    );

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "REMOTE_FAILURE");
    assert_eq!(
        body["message"],
        "Failed to create user. Status: 409 User exists with same username"
    );
}

#[test]
fn test_malformed_json_is_bad_request() {
    let keycloak = TestKeycloak::start();

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::post()
            .uri("/api/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[test]
fn test_update_password() {
    let keycloak = TestKeycloak::start();
    let reset = keycloak.server.mock(|when, then| {
        when.method(PUT)
            .path(format!("{USERS}/u-1/reset-password"))
            .json_body(json!({"type": "password", "value": "n3w", "temporary": false}));
        then.status(204);
    });

    let (status, _) = call(
        &keycloak.directory,
        TestRequest::put()
            .uri("/api/users/u-1/password")
            .set_json(json!({"password": ""})),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &keycloak.directory,
        TestRequest::put()
            .uri("/api/users/u-1/password")
            .set_json(json!({"password": "n3w"})),
    );
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(reset.calls(), 1);
}

#[test]
fn test_disable_user_returns_refreshed_user() {
    let keycloak = TestKeycloak::start();
    keycloak.server.mock(|when, then| {
        when.method(GET).path(format!("{USERS}/u-1"));
        then.status(200)
            .json_body(json!({"id": "u-1", "username": "alice", "enabled": false}));
    });
    let put = keycloak.server.mock(|when, then| {
        when.method(PUT)
            .path(format!("{USERS}/u-1"))
            .body_includes(r#""enabled":false"#);
        then.status(204);
    });
    keycloak.mock_roles("u-1", &["CLIENT"]);

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::put().uri("/api/users/u-1/disable"),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], false);
    put.assert();
}

#[test]
fn test_remove_unknown_role_is_bad_request() {
    let keycloak = TestKeycloak::start();

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::delete().uri("/api/users/u-1/roles/owner"),
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid role: owner");
}

#[test]
fn test_assign_role_returns_refreshed_user() {
    let keycloak = TestKeycloak::start();
    keycloak.server.mock(|when, then| {
        when.method(GET).path("/admin/realms/micromall/roles/ADMIN");
        then.status(200).json_body(json!({"id": "r-2", "name": "ADMIN"}));
    });
    let assign = keycloak.server.mock(|when, then| {
        when.method(POST)
            .path(format!("{USERS}/u-1/role-mappings/realm"))
            .json_body(json!([{"id": "r-2", "name": "ADMIN"}]));
        then.status(204);
    });
    keycloak.server.mock(|when, then| {
        when.method(GET).path(format!("{USERS}/u-1"));
        then.status(200)
            .json_body(json!({"id": "u-1", "username": "alice", "enabled": true}));
    });
    keycloak.mock_roles("u-1", &["CLIENT", "ADMIN"]);

    let (status, body) = call(
        &keycloak.directory,
        TestRequest::post()
            .uri("/api/users/u-1/roles")
            .set_json(json!({"role": "admin"})),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"], json!(["CLIENT", "ADMIN"]));
    assign.assert();
}

#[test]
fn test_unreachable_identity_provider_is_service_unavailable() {
    let directory = common::directory("http://127.0.0.1:1");

    let (status, body) = call(&directory, TestRequest::get().uri("/api/users/u-1"));

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}
