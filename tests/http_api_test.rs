use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use regdesk::config::{Config, CoordinatorSeed};
use regdesk::domain::coordinator::Role;
use regdesk::infrastructure::Stores;
use regdesk::interfaces::http::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN: &str = "admin-token";
const DESK_A: &str = "desk-a-token";
const DESK_B: &str = "desk-b-token";

async fn app() -> Router {
    let config = Config {
        coordinators: vec![
            seed("root", Role::Admin, ADMIN),
            seed("desk-a", Role::Coordinator, DESK_A),
            seed("desk-b", Role::Coordinator, DESK_B),
        ],
        ..Default::default()
    };
    let stores = Stores::in_memory();
    config
        .seed_coordinators(&stores.coordinators, None)
        .await
        .unwrap();
    router(AppState::new(stores, config.fees), &config.cors_origins).unwrap()
}

fn seed(id: &str, role: Role, token: &str) -> CoordinatorSeed {
    CoordinatorSeed {
        id: id.into(),
        name: id.into(),
        role,
        token: token.into(),
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, user_id: &str, college: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/registrations",
        Some(DESK_A),
        Some(json!({
            "userId": user_id,
            "name": format!("Student {user_id}"),
            "email": format!("{}@example.com", user_id.to_lowercase()),
            "phone": "9000000000",
            "college": college,
            "userType": "participant",
            "participationType": "sports",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["registration"].clone()
}

#[tokio::test]
async fn test_health_is_open_and_uncached() {
    let app = app().await;
    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn test_bearer_token_required() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/registrations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    let (status, _) = send(&app, "GET", "/api/registrations", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/me", Some(DESK_A), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coordinator"]["id"], json!("desk-a"));
    assert_eq!(body["coordinator"]["role"], json!("coordinator"));
}

#[tokio::test]
async fn test_partial_payments_accumulate() {
    let app = app().await;
    let registration = register(&app, "MH001", "JNTU Kakinada").await;
    assert_eq!(registration["payment"]["status"], json!("unpaid"));
    assert_eq!(registration["payment"]["amountDue"].as_f64(), Some(200.0));
    assert!(registration["registerId"].as_str().unwrap().starts_with("REG"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/payments/MH001/process",
        Some(DESK_A),
        Some(json!({"amount": 120, "method": "cash"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let payment = &body["registration"]["payment"];
    assert_eq!(payment["status"], json!("pending"));
    assert_eq!(payment["remaining"].as_f64(), Some(80.0));
    assert_eq!(payment["processedBy"], json!("desk-a"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/payments/mh001/process",
        Some(DESK_A),
        Some(json!({"amount": 80, "method": "upi"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration"]["payment"]["status"], json!("paid"));
    assert_eq!(body["registration"]["payment"]["paid"].as_f64(), Some(200.0));

    let (status, body) = send(
        &app,
        "POST",
        "/api/payments/MH001/process",
        Some(DESK_A),
        Some(json!({"amount": 10, "method": "cash"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_payment_input_validation() {
    let app = app().await;
    register(&app, "MH001", "JNTU Kakinada").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/payments/MH001/process",
        Some(DESK_A),
        Some(json!({"amount": -5, "method": "cash"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    let (status, _) = send(
        &app,
        "POST",
        "/api/payments/MH001/process",
        Some(DESK_A),
        Some(json!({"amount": 5, "method": "cheque"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/payments/NOBODY/process",
        Some(DESK_A),
        Some(json!({"amount": 5, "method": "cash"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The payment method is required.
    let (status, body) = send(
        &app,
        "POST",
        "/api/payments/MH001/process",
        Some(DESK_A),
        Some(json!({"amount": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_oversized_amounts_rejected() {
    let app = app().await;
    register(&app, "MH001", "JNTU Kakinada").await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/payments/MH001",
        Some(DESK_A),
        Some(json!({"paid": 5e28, "status": "pending"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/payments/MH001/process",
        Some(DESK_A),
        Some(json!({"amount": 5e28, "method": "cash"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/registrations/MH001", Some(DESK_A), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration"]["payment"]["status"], json!("unpaid"));
}

#[tokio::test]
async fn test_huge_page_numbers_return_empty_pages() {
    let app = app().await;
    register(&app, "MH001", "JNTU Kakinada").await;
    send(
        &app,
        "POST",
        "/api/payments/MH001/process",
        Some(DESK_A),
        Some(json!({"amount": 20, "method": "cash"})),
    )
    .await;

    for uri in [
        "/api/registrations?page=18446744073709551615&limit=2",
        "/api/payments/mine?page=18446744073709551615&limit=18446744073709551615",
    ] {
        let (status, body) = send(&app, "GET", uri, Some(DESK_A), None).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {body}");
        assert_eq!(body["pagination"]["total"], json!(1));
    }
}

#[tokio::test]
async fn test_transaction_reference_recorded() {
    let app = app().await;
    register(&app, "MH001", "JNTU Kakinada").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/payments/MH001/process",
        Some(DESK_A),
        Some(json!({"amount": 200, "method": "upi", "transactionId": "UPI-20260301-77"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(
        body["registration"]["payment"]["transactionId"],
        json!("UPI-20260301-77")
    );

    let (_, body) = send(&app, "DELETE", "/api/payments/MH001", Some(DESK_A), None).await;
    assert_eq!(body["registration"]["payment"]["transactionId"], Value::Null);
}

#[tokio::test]
async fn test_mark_paid_amend_and_reset() {
    let app = app().await;
    register(&app, "MH001", "VFSTR Vadlamudi").await;

    // No body at all charges the discounted fee.
    let (status, body) = send(&app, "POST", "/api/payments/MH001/mark-paid", Some(DESK_B), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let payment = &body["registration"]["payment"];
    assert_eq!(payment["status"], json!("paid"));
    assert_eq!(payment["paid"].as_f64(), Some(150.0));
    assert_eq!(payment["method"], json!("cash"));

    let (status, body) = send(
        &app,
        "PUT",
        "/api/payments/MH001",
        Some(DESK_B),
        Some(json!({"paid": 50})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration"]["payment"]["status"], json!("pending"));

    let (status, body) = send(&app, "DELETE", "/api/payments/MH001", Some(DESK_B), None).await;
    assert_eq!(status, StatusCode::OK);
    let payment = &body["registration"]["payment"];
    assert_eq!(payment["status"], json!("unpaid"));
    assert_eq!(payment["paid"].as_f64(), Some(0.0));
    assert_eq!(payment["amountDue"].as_f64(), Some(150.0));
}

#[tokio::test]
async fn test_unpaid_list_and_reports() {
    let app = app().await;
    for user in ["MH001", "MH002", "MH003"] {
        register(&app, user, "JNTU Kakinada").await;
    }
    send(&app, "POST", "/api/payments/MH001/mark-paid", Some(DESK_A), Some(json!({"method": "upi"}))).await;
    send(
        &app,
        "POST",
        "/api/payments/MH002/process",
        Some(DESK_B),
        Some(json!({"amount": 50, "method": "cash"})),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/payments/unpaid", Some(DESK_A), None).await;
    assert_eq!(body["count"], json!(2));

    let (status, body) = send(&app, "GET", "/api/payments/mine", Some(DESK_A), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], json!(1));
    assert_eq!(body["statistics"]["paidCount"], json!(1));
    assert_eq!(body["statistics"]["upiAmount"].as_f64(), Some(200.0));

    let (_, body) = send(&app, "GET", "/api/reports/summary", Some(ADMIN), None).await;
    let summary = &body["summary"];
    assert_eq!(summary["totalRegistrations"], json!(3));
    assert_eq!(summary["byStatus"]["paid"]["count"], json!(1));
    assert_eq!(summary["byStatus"]["pending"]["count"], json!(1));
    assert_eq!(summary["byCoordinator"]["desk-b"]["amount"].as_f64(), Some(50.0));
    assert_eq!(summary["totalPaid"].as_f64(), Some(250.0));

    let (_, body) = send(&app, "GET", "/api/reports/summary", Some(DESK_B), None).await;
    assert_eq!(body["summary"]["totalRegistrations"], json!(1));
}

#[tokio::test]
async fn test_registration_listing_and_admin_delete() {
    let app = app().await;
    register(&app, "MH001", "JNTU Kakinada").await;
    register(&app, "MH002", "JNTU Kakinada").await;

    let (status, body) = send(&app, "GET", "/api/registrations?search=mh002", Some(DESK_A), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registrations"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["total"], json!(1));

    let (status, _) = send(&app, "GET", "/api/registrations?status=bogus", Some(DESK_A), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/registrations",
        Some(DESK_A),
        Some(json!({
            "userId": "mh001",
            "name": "Someone Else",
            "email": "else@example.com",
            "phone": "9000000009",
            "college": "JNTU Kakinada",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, _) = send(&app, "DELETE", "/api/registrations/MH001", Some(DESK_A), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", "/api/registrations/MH001", Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/registrations/MH001", Some(DESK_A), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_signup() {
    let app = app().await;
    register(&app, "MH001", "JNTU Kakinada").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/events",
        Some(DESK_A),
        Some(json!({
            "title": "Kabaddi",
            "description": "Inter-college kabaddi",
            "category": "sports",
            "eventDate": "2026-03-01T10:00:00Z",
            "venue": "Ground 2",
            "maxParticipants": 12,
            "status": "published",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let event_id = body["event"]["id"].clone();

    let (status, body) = send(
        &app,
        "POST",
        "/api/events/register",
        Some(DESK_A),
        Some(json!({"userId": "MH001", "eventIds": [event_id]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["registration"]["event"], json!("Kabaddi"));

    let (_, body) = send(&app, "GET", "/api/events", Some(DESK_B), None).await;
    assert_eq!(body["events"][0]["currentParticipants"], json!(1));

    let (_, body) = send(&app, "GET", "/api/events?mine=true", Some(DESK_B), None).await;
    assert_eq!(body["count"], json!(0));

    let id = event_id.as_str().unwrap();
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/events/{id}/registrations"),
        Some(DESK_A),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["event"]["currentParticipants"], json!(1));
    assert_eq!(body["registrations"][0]["userId"], json!("MH001"));
    assert_eq!(body["pagination"]["total"], json!(1));

    let roster = format!("/api/events/{id}/registrations");
    let (status, _) = send(&app, "GET", &roster, Some(DESK_B), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "GET", &roster, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_task_lifecycle() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks",
        None,
        Some(json!({"title": "Book the auditorium", "priority": "high"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["task"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["task"]["status"], json!("pending"));

    send(&app, "POST", "/api/tasks", None, Some(json!({"title": "Order lunch"}))).await;

    let (status, _) = send(&app, "POST", "/api/tasks", None, Some(json!({"title": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "PATCH", &format!("/api/tasks/{id}/toggle"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["status"], json!("completed"));

    let (_, body) = send(&app, "GET", "/api/tasks?status=completed", None, None).await;
    assert_eq!(body["count"], json!(1));

    let (_, body) = send(&app, "GET", "/api/tasks?sortBy=priority&order=asc", None, None).await;
    assert_eq!(body["tasks"][1]["priority"], json!("high"));

    let (_, body) = send(&app, "GET", "/api/tasks/stats", None, None).await;
    assert_eq!(body["stats"]["total"], json!(2));
    assert_eq!(body["stats"]["completionRate"].as_f64(), Some(50.0));

    let (status, _) = send(&app, "GET", "/api/tasks/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &format!("/api/tasks/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/api/tasks/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
