//! Integration tests for the help request lifecycle.

mod common;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn test_anonymous_create_starts_pending() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let request = TestHelpRequest::new();
    let body = create_test_help_request(&app, &request, None).await;

    assert_eq!(body["status"], "pending");
    assert_eq!(body["email"], request.email.to_lowercase());
    assert_eq!(body["helpType"], "shopping");
    assert!(body["volunteerId"].is_null());
}

#[tokio::test]
async fn test_create_rejects_invalid_phone() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let mut body = TestHelpRequest::new().body();
    body["phone"] = serde_json::Value::String("12345".to_string());

    let response = app
        .oneshot(json_request(Method::POST, "/api/v1/help-requests", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = parse_response_body(response).await;
    assert_eq!(json["error"], "validation_error");
    assert!(json["details"].is_array());
}

#[tokio::test]
async fn test_create_strips_markup_from_description() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let mut request = TestHelpRequest::new();
    request.description = "<script>alert(1)</script>Groceries please".to_string();
    let body = create_test_help_request(&app, &request, None).await;

    let description = body["description"].as_str().unwrap();
    assert!(!description.contains('<'));
    assert!(description.contains("Groceries please"));
}

#[tokio::test]
async fn test_get_requires_proof_of_ownership() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let request = TestHelpRequest::new();
    let created = create_test_help_request(&app, &request, None).await;
    let id = created["id"].as_str().unwrap();

    // No credentials at all: indistinguishable from a missing record
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/help-requests/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Wrong email: same shape
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/v1/help-requests/{}?email=stranger@example.com",
            id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Owner email unlocks the full record
    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/help-requests/{}?email={}",
            id, request.email
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    assert_eq!(json["phone"], request.phone);
}

#[tokio::test]
async fn test_unknown_id_and_unauthorized_id_are_identical() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let created = create_test_help_request(&app, &TestHelpRequest::new(), None).await;
    let id = created["id"].as_str().unwrap();

    let unauthorized = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/help-requests/{}", id)))
        .await
        .unwrap();
    let missing = app
        .oneshot(get_request(&format!(
            "/api/v1/help-requests/{}",
            uuid::Uuid::new_v4()
        )))
        .await
        .unwrap();

    assert_eq!(unauthorized.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let unauthorized_body = parse_response_body(unauthorized).await;
    let missing_body = parse_response_body(missing).await;
    assert_eq!(unauthorized_body, missing_body);
}

#[tokio::test]
async fn test_authenticated_owner_sees_own_requests_in_list() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let user = TestUser::new();
    let auth = create_authenticated_user(&app, &user).await;

    let request = TestHelpRequest::new().with_email(&user.email);
    create_test_help_request(&app, &request, Some(&auth.access_token)).await;

    let response = app
        .oneshot(get_request_with_auth(
            "/api/v1/help-requests",
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["email"], user.email.to_lowercase());
    assert_eq!(json["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_anonymous_list_is_unauthorized() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let response = app
        .oneshot(get_request("/api/v1/help-requests"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_rejects_unknown_status_filter() {
    let Some((app, pool)) = setup().await else {
        return;
    };

    let admin = create_admin_user(&app, &pool).await;

    let response = app
        .oneshot(get_request_with_auth(
            "/api/v1/help-requests?status=archived",
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_events_view_is_public_and_carries_no_contact_fields() {
    let Some((app, pool)) = setup().await else {
        return;
    };

    let admin = create_admin_user(&app, &pool).await;

    let created = create_test_help_request(&app, &TestHelpRequest::new(), None).await;
    let id = created["id"].as_str().unwrap();

    // Only approved requests appear on the board
    let (status, _) =
        transition_status(&app, id, "approved", Some(&admin.access_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .oneshot(get_request("/api/v1/help-requests?view=events"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    let data = json["data"].as_array().unwrap();
    assert!(!data.is_empty());

    let event = data
        .iter()
        .find(|e| e["id"].as_str() == Some(id))
        .expect("approved request should be on the board");
    assert_eq!(event["status"], "approved");
    assert!(event.get("email").is_none());
    assert!(event.get("phone").is_none());
    assert!(event.get("address").is_none());
    assert!(event.get("fullName").is_none());
}

#[tokio::test]
async fn test_events_view_ignores_status_filter() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let created = create_test_help_request(&app, &TestHelpRequest::new(), None).await;
    let id = created["id"].as_str().unwrap();

    // A status filter cannot widen the board beyond approved requests
    let response = app
        .oneshot(get_request(
            "/api/v1/help-requests?view=events&status=pending",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    let data = json["data"].as_array().unwrap();
    assert!(data.iter().all(|e| e["status"] == "approved"));
    assert!(data.iter().all(|e| e["id"].as_str() != Some(id)));
}

#[tokio::test]
async fn test_admin_approve_then_reject_is_invalid() {
    let Some((app, pool)) = setup().await else {
        return;
    };

    let admin = create_admin_user(&app, &pool).await;
    let created = create_test_help_request(&app, &TestHelpRequest::new(), None).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) =
        transition_status(&app, id, "approved", Some(&admin.access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    // rejected is only reachable from pending
    let (status, body) =
        transition_status(&app, id, "rejected", Some(&admin.access_token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_transition");
}

#[tokio::test]
async fn test_owner_cancel_with_confirmation_email() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let request = TestHelpRequest::new();
    let created = create_test_help_request(&app, &request, None).await;
    let id = created["id"].as_str().unwrap();

    // Without proof of ownership the transition is forbidden
    let (status, _) = transition_status(&app, id, "cancelled", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) =
        transition_status(&app, id, "cancelled", None, Some(&request.email)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");
}

#[tokio::test]
async fn test_owner_cannot_approve_own_request() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let request = TestHelpRequest::new();
    let created = create_test_help_request(&app, &request, None).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) =
        transition_status(&app, id, "approved", None, Some(&request.email)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_volunteer_self_assignment() {
    let Some((app, pool)) = setup().await else {
        return;
    };

    let admin = create_admin_user(&app, &pool).await;
    let volunteer = create_authenticated_user(&app, &TestUser::volunteer()).await;

    let created = create_test_help_request(&app, &TestHelpRequest::new(), None).await;
    let id = created["id"].as_str().unwrap();

    // Volunteers cannot claim a request before approval
    let (status, _) =
        transition_status(&app, id, "matched", Some(&volunteer.access_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    transition_status(&app, id, "approved", Some(&admin.access_token), None).await;

    let (status, body) =
        transition_status(&app, id, "matched", Some(&volunteer.access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "matched");
    assert_eq!(body["volunteerId"], volunteer.user_id);
}

#[tokio::test]
async fn test_admin_match_without_volunteer_leaves_assignment_empty() {
    let Some((app, pool)) = setup().await else {
        return;
    };

    let admin = create_admin_user(&app, &pool).await;
    let created = create_test_help_request(&app, &TestHelpRequest::new(), None).await;
    let id = created["id"].as_str().unwrap();

    transition_status(&app, id, "approved", Some(&admin.access_token), None).await;

    let (status, body) =
        transition_status(&app, id, "matched", Some(&admin.access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "matched");
    // The matching admin coordinates; they are not the assigned volunteer
    assert!(body["volunteerId"].is_null());
}

#[tokio::test]
async fn test_admin_match_assigns_named_volunteer() {
    let Some((app, pool)) = setup().await else {
        return;
    };

    let admin = create_admin_user(&app, &pool).await;
    let volunteer = create_authenticated_user(&app, &TestUser::volunteer()).await;

    let created = create_test_help_request(&app, &TestHelpRequest::new(), None).await;
    let id = created["id"].as_str().unwrap();

    transition_status(&app, id, "approved", Some(&admin.access_token), None).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/help-requests/{}/status", id),
            serde_json::json!({
                "status": "matched",
                "volunteerId": volunteer.user_id,
            }),
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "matched");
    assert_eq!(body["volunteerId"], volunteer.user_id);
}

#[tokio::test]
async fn test_owner_cannot_cancel_after_match() {
    let Some((app, pool)) = setup().await else {
        return;
    };

    let admin = create_admin_user(&app, &pool).await;
    let volunteer = create_authenticated_user(&app, &TestUser::volunteer()).await;

    let request = TestHelpRequest::new();
    let created = create_test_help_request(&app, &request, None).await;
    let id = created["id"].as_str().unwrap();

    transition_status(&app, id, "approved", Some(&admin.access_token), None).await;
    transition_status(&app, id, "matched", Some(&volunteer.access_token), None).await;

    let (status, body) =
        transition_status(&app, id, "cancelled", None, Some(&request.email)).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["error"], "precondition_failed");
}

#[tokio::test]
async fn test_admin_reset_reopens_terminal_request() {
    let Some((app, pool)) = setup().await else {
        return;
    };

    let admin = create_admin_user(&app, &pool).await;
    let created = create_test_help_request(&app, &TestHelpRequest::new(), None).await;
    let id = created["id"].as_str().unwrap();

    transition_status(&app, id, "rejected", Some(&admin.access_token), None).await;

    let (status, body) =
        transition_status(&app, id, "pending", Some(&admin.access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn test_update_cannot_change_status() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let request = TestHelpRequest::new();
    let created = create_test_help_request(&app, &request, None).await;
    let id = created["id"].as_str().unwrap();

    // A status field in the update payload is silently ignored
    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/v1/help-requests/{}", id),
            serde_json::json!({
                "confirmEmail": request.email,
                "description": "Updated description",
                "status": "completed",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    assert_eq!(json["description"], "Updated description");
    assert_eq!(json["status"], "pending");
}

#[tokio::test]
async fn test_update_requires_matching_confirmation_email() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let request = TestHelpRequest::new();
    let created = create_test_help_request(&app, &request, None).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/v1/help-requests/{}", id),
            serde_json::json!({
                "confirmEmail": "stranger@example.com",
                "description": "Hijacked",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_owner_delete_with_confirmation() {
    let Some((app, _pool)) = setup().await else {
        return;
    };

    let request = TestHelpRequest::new();
    let created = create_test_help_request(&app, &request, None).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::DELETE,
            &format!("/api/v1/help-requests/{}", id),
            serde_json::json!({ "confirmEmail": request.email }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/help-requests/{}?email={}",
            id, request.email
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_transition_loses_compare_and_swap() {
    let Some((app, pool)) = setup().await else {
        return;
    };

    use domain::models::help_request::HelpRequestStatus;
    use persistence::repositories::HelpRequestRepository;

    let created = create_test_help_request(&app, &TestHelpRequest::new(), None).await;
    let id: uuid::Uuid = created["id"].as_str().unwrap().parse().unwrap();

    let repo = HelpRequestRepository::new(pool);

    // First writer wins
    let updated = repo
        .transition_status(
            id,
            HelpRequestStatus::Pending,
            HelpRequestStatus::Approved,
            None,
            None,
        )
        .await
        .unwrap();
    assert!(updated.is_some());

    // Second writer raced on the same snapshot and matches zero rows
    let stale = repo
        .transition_status(
            id,
            HelpRequestStatus::Pending,
            HelpRequestStatus::Rejected,
            None,
            None,
        )
        .await
        .unwrap();
    assert!(stale.is_none());
}
