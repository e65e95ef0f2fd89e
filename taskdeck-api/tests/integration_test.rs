/// Integration tests for the Taskdeck API
///
/// These tests require a running PostgreSQL database (see common/mod.rs for
/// the DATABASE_URL fallback) and verify the HTTP surface end-to-end:
/// status codes, error mapping, and the membership/lifecycle rules as seen
/// by a client.
mod common;

use axum::http::StatusCode;
use common::{body_json, json_request, request, unique_email, TestContext};
use serde_json::json;
use tower::Service as _;

#[tokio::test]
async fn health_reports_connected_database() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.app.clone().call(request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn signup_returns_created_without_password() {
    let ctx = TestContext::new().await.unwrap();

    let email = unique_email("signup");
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/user",
            json!({"name": "New User", "email": email, "password": "Sup3r-secret"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["email"], email.as_str());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    // Duplicate signup is a client error
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/user",
            json!({"name": "Copycat", "email": email, "password": "0ther-secret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let user_id = {
        let users = taskdeck_shared::models::user::User::find_by_email(&ctx.db, &email)
            .await
            .unwrap()
            .unwrap();
        users.id
    };
    taskdeck_shared::models::user::User::delete(&ctx.db, user_id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn project_lifecycle_over_http() {
    let ctx = TestContext::new().await.unwrap();

    // Create
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/project",
            json!({"ownerId": ctx.owner.id, "name": "Website", "description": "Relaunch"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let project = body_json(response).await;
    let project_id = project["id"].as_i64().unwrap();

    // Detail carries the derived task count
    let response = ctx
        .app
        .clone()
        .call(request("GET", &format!("/project/{}", project_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["name"], "Website");
    assert_eq!(detail["tasksCount"], 0);

    // Partial update leaves the description alone
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "PATCH",
            &format!("/project/{}", project_id),
            json!({"name": "Website v2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Website v2");
    assert_eq!(updated["description"], "Relaunch");

    // Delete
    let response = ctx
        .app
        .clone()
        .call(request("DELETE", &format!("/project/{}", project_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone
    let response = ctx
        .app
        .clone()
        .call(request("GET", &format!("/project/{}", project_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn listing_requires_valid_paging() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .clone()
        .call(request("GET", "/project?page=0&size=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert!(page["data"].is_array());
    assert_eq!(page["page"], 0);
    assert_eq!(page["size"], 10);

    for uri in ["/project?page=0", "/project?size=10", "/project?page=-1&size=10", "/project?page=0&size=0"] {
        let response = ctx.app.clone().call(request("GET", uri)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected 400 for {}",
            uri
        );
    }

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn only_the_owner_may_add_members_over_http() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/user",
            json!({"name": "Member", "email": unique_email("member"), "password": "Sup3r-secret"}),
        ))
        .await
        .unwrap();
    let member = body_json(response).await;
    let member_id = member["id"].as_i64().unwrap();

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/project",
            json!({"ownerId": ctx.owner.id, "name": "P", "description": "d"}),
        ))
        .await
        .unwrap();
    let project = body_json(response).await;
    let project_id = project["id"].as_i64().unwrap();

    // Owner adds the member
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &format!("/project/add-member/{}", ctx.owner.id),
            json!({"userId": member_id, "projectId": project_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The member may not add anyone
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &format!("/project/add-member/{}", member_id),
            json!({"userId": ctx.owner.id, "projectId": project_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Only the project owner can add members");

    // Removing someone who was never a member is 404
    let response = ctx
        .app
        .clone()
        .call(request(
            "DELETE",
            &format!("/project/remove-member/{}/{}/{}", project_id, 999_999, ctx.owner.id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    taskdeck_shared::models::user::User::delete(&ctx.db, member_id as i32)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn task_lifecycle_over_http() {
    let ctx = TestContext::new().await.unwrap();

    // Seed a project and a tag
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/project",
            json!({"ownerId": ctx.owner.id, "name": "Board", "description": "d"}),
        ))
        .await
        .unwrap();
    let project_id = body_json(response).await["id"].as_i64().unwrap();

    let response = ctx
        .app
        .clone()
        .call(json_request("POST", "/tag", json!({"title": "urgent"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let tag_id = body_json(response).await["id"].as_i64().unwrap();

    // Creating without the acting user is a client error
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/task/create-task",
            json!({"title": "T", "description": "d", "status": "Pending", "projectId": project_id, "tags": [tag_id]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Empty tag list is rejected
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &format!("/task/create-task?userId={}", ctx.owner.id),
            json!({"title": "T", "description": "d", "status": "Pending", "projectId": project_id, "tags": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown tag is 404
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &format!("/task/create-task?userId={}", ctx.owner.id),
            json!({"title": "T", "description": "d", "status": "Pending", "projectId": project_id, "tags": [tag_id, 999_999]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Valid creation
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &format!("/task/create-task?userId={}", ctx.owner.id),
            json!({"title": "Ship it", "description": "d", "status": "Pending", "projectId": project_id, "tags": [tag_id]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await;
    let task_id = task["id"].as_i64().unwrap();
    assert_eq!(task["status"], "Pending");

    // Detail carries the tags
    let response = ctx
        .app
        .clone()
        .call(request("GET", &format!("/task/task/{}", task_id)))
        .await
        .unwrap();
    let detail = body_json(response).await;
    assert_eq!(detail["tags"][0]["id"], tag_id);

    // Board listing
    let response = ctx
        .app
        .clone()
        .call(request("GET", &format!("/task/by-project/{}", project_id)))
        .await
        .unwrap();
    let board = body_json(response).await;
    assert_eq!(board["data"].as_array().unwrap().len(), 1);

    // Complete the task, then verify the lock
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "PATCH",
            &format!("/task/task/{}?userId={}", task_id, ctx.owner.id),
            json!({"status": "Done"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "PATCH",
            &format!("/task/task/{}?userId={}", task_id, ctx.owner.id),
            json!({"title": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Completed tasks cannot be edited");

    let response = ctx
        .app
        .clone()
        .call(request(
            "DELETE",
            &format!("/task/task/{}?userId={}", task_id, ctx.owner.id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Cleanup: cascade removes the completed task with the project
    let response = ctx
        .app
        .clone()
        .call(request("DELETE", &format!("/project/{}", project_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .clone()
        .call(request("DELETE", &format!("/tag/tag/{}", tag_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    ctx.cleanup().await.unwrap();
}
