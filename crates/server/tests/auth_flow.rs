mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use support::*;

fn signup_body(email: &str) -> serde_json::Value {
    json!({"name": "Carla Rojas", "email": email, "password": "S3curePass!", "city": "Cochabamba"})
}

fn with_bearer(method: &str, uri: &str, token: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn signup_then_login() {
    let t = build_app(false);

    let resp = t.app.clone().oneshot(json_request("POST", "/users", &signup_body("carla@example.com"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let user = body_json(resp).await;
    assert_eq!(user["email"], "carla@example.com");
    assert_eq!(user["city"], "Cochabamba");
    assert!(user["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(user.get("password").is_none());

    let resp = t.app.clone().oneshot(json_request("POST", "/users", &signup_body("carla@example.com"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await["message"], "Este email ya existe");

    let login = json!({"email": "carla@example.com", "password": "S3curePass!"});
    let resp = t.app.clone().oneshot(json_request("POST", "/login", &login)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let session = body_json(resp).await;
    assert_eq!(session["message"], "Start session successfully");
    assert_eq!(session["name"], "Carla Rojas");
    assert_eq!(session["id"], user["id"]);

    let wrong = json!({"email": "carla@example.com", "password": "nope-nope"});
    let resp = t.app.clone().oneshot(json_request("POST", "/login", &wrong)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["message"], "email or password incorrect");
}

#[tokio::test]
async fn google_login_creates_then_reuses_the_account() {
    let t = build_app(false);

    let resp = t.app.clone().oneshot(with_bearer("GET", "/google", GOOGLE_TOKEN, Body::empty())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["email"], "luz@example.com");
    assert_eq!(created["name"], "Luz Mamani");
    assert!(created["token"].is_string());

    let resp = t.app.clone().oneshot(with_bearer("GET", "/google", GOOGLE_TOKEN, Body::empty())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let session = body_json(resp).await;
    assert_eq!(session["message"], "Starting session successfully");
    assert_eq!(session["id"], created["id"]);

    let resp = t.app.clone().oneshot(empty_request("GET", "/google")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = t.app.clone().oneshot(with_bearer("GET", "/google", "forged", Body::empty())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn users_listing_update_and_toggle() {
    let t = build_app(false);
    let resp = t.app.clone().oneshot(json_request("POST", "/users", &signup_body("carla@example.com"))).await.unwrap();
    let id = body_json(resp).await["id"].as_str().unwrap().to_string();

    let resp = t.app.clone().oneshot(empty_request("GET", "/users")).await.unwrap();
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

    let resp = t
        .app
        .clone()
        .oneshot(json_request("PUT", &format!("/users/{id}"), &json!({"phone": "71234567"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["phone"], "71234567");
    assert_eq!(updated["city"], "Cochabamba");

    let resp = t.app.clone().oneshot(empty_request("PATCH", &format!("/users/isActive/{id}"))).await.unwrap();
    assert_eq!(body_json(resp).await["isActive"], false);

    let missing = uuid::Uuid::new_v4();
    let resp = t.app.clone().oneshot(empty_request("GET", &format!("/users/{missing}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "User not found");
}

#[tokio::test]
async fn protected_mutations_need_a_valid_bearer_token() {
    let t = build_app(true);
    let owner = t.store.seed_user("Ana", "ana@example.com").await;
    let fields = restaurant_fields("Napoli", &owner.id.to_string());
    let body = || multipart_body(&as_pairs(&fields), &[]);

    let resp = t.app.clone().oneshot(multipart_request("POST", "/restaurants", body())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["message"], "No se proporcionó un token de autenticación");

    let mut req = multipart_request("POST", "/restaurants", body());
    req.headers_mut().insert("authorization", "Bearer not-a-jwt".parse().unwrap());
    let resp = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await["message"], "Token inválido");

    let token = t.state.auth.issue_token(&owner).unwrap();
    let mut req = multipart_request("POST", "/restaurants", body());
    req.headers_mut().insert("authorization", format!("Bearer {token}").parse().unwrap());
    let resp = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // reads and signup stay open
    let resp = t.app.clone().oneshot(empty_request("GET", "/restaurants")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = t.app.clone().oneshot(json_request("POST", "/users", &signup_body("new@example.com"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_login_body_is_a_json_400() {
    let t = build_app(false);
    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from("{\"email\":"))
        .unwrap();
    let resp = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["message"].is_string());
}
