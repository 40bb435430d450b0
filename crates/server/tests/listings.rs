mod support;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use support::*;

async fn create_restaurant(t: &TestApp, name: &str, user_id: &str) -> serde_json::Value {
    let fields = restaurant_fields(name, user_id);
    let body = multipart_body(&as_pairs(&fields), &[("front.png", &b"png-bytes"[..])]);
    let resp = t.app.clone().oneshot(multipart_request("POST", "/restaurants", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

#[tokio::test]
async fn create_uploads_images_and_search_reports_ratings() {
    let t = build_app(false);
    let owner = t.store.seed_user("Ana Quispe", "ana@example.com").await;
    let created = create_restaurant(&t, "Pizzeria Napoli", &owner.id.to_string()).await;

    assert_eq!(created["name"], "Pizzeria Napoli");
    assert_eq!(created["isActive"], true);
    assert_eq!(created["zone"], "Central");
    assert_eq!(created["web"], "No hay dirección web");
    let image = created["images"][0].as_str().unwrap();
    assert!(image.starts_with("https://media.test/restaurants_images/"));
    assert_eq!(t.media.uploaded().await.len(), 1);

    let resp = t.app.clone().oneshot(empty_request("GET", "/restaurants?search=NAPO")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["currentPage"], 1);
    assert_eq!(page["totalResults"], 1);
    assert!(page["restaurants"][0]["averageStars"].is_null());

    let id = created["id"].as_str().unwrap();
    for stars in [3.0, 5.0] {
        let req = json_request("POST", "/comments", &json!({"comments": "Buena", "stars": stars, "restaurant_id": id}));
        let resp = t.app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let resp = t.app.clone().oneshot(empty_request("GET", "/restaurants")).await.unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["restaurants"][0]["averageStars"], 4.0);
}

#[tokio::test]
async fn missing_required_field_is_a_bad_request() {
    let t = build_app(false);
    let owner = t.store.seed_user("Ana", "ana@example.com").await;
    let fields: Vec<_> = restaurant_fields("Sin nombre", &owner.id.to_string())
        .into_iter()
        .filter(|(k, _)| k != "offers")
        .collect();
    let body = multipart_body(&as_pairs(&fields), &[]);
    let resp = t.app.clone().oneshot(multipart_request("POST", "/restaurants", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "offers is required");
}

#[tokio::test]
async fn failed_upload_is_a_server_error_and_stores_nothing() {
    let t = build_app(false);
    t.media.set_failing(true);
    let owner = t.store.seed_user("Ana", "ana@example.com").await;
    let fields = restaurant_fields("Polleria", &owner.id.to_string());
    let body = multipart_body(&as_pairs(&fields), &[("a.png", &b"x"[..])]);
    let resp = t.app.clone().oneshot(multipart_request("POST", "/restaurants", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = body_json(resp).await["message"].as_str().unwrap().to_string();
    assert!(message.contains("Error uploading images"));

    let resp = t.app.clone().oneshot(empty_request("GET", "/restaurants")).await.unwrap();
    assert_eq!(body_json(resp).await["totalResults"], 0);
}

#[tokio::test]
async fn category_search_matches_overlap_and_404s_when_empty() {
    let t = build_app(false);
    let owner = t.store.seed_user("Ana", "ana@example.com").await;
    create_restaurant(&t, "Napoli", &owner.id.to_string()).await;

    let resp = t
        .app
        .clone()
        .oneshot(empty_request("GET", "/restaurants/categories?categories=Mariscos&categories=Pizzeria"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["totalResults"], 1);
    assert!(page["currentPage"].is_null());

    let resp = t
        .app
        .clone()
        .oneshot(empty_request("GET", "/restaurants/categories?categories=Mariscos&page=1&limit=5"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Restaurant listings not found");

    let resp = t
        .app
        .clone()
        .oneshot(empty_request("GET", "/restaurants/categories?categories=Sushi"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn movie_theaters_have_no_category_route() {
    let t = build_app(false);
    let resp = t
        .app
        .clone()
        .oneshot(empty_request("GET", "/movieTheaters/categories?categories=Otros"))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn toggle_hides_from_search_but_not_from_owner() {
    let t = build_app(false);
    let owner = t.store.seed_user("Ana", "ana@example.com").await;
    let created = create_restaurant(&t, "Napoli", &owner.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    let resp = t.app.clone().oneshot(empty_request("PATCH", &format!("/restaurants/isActive/{id}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["isActive"], false);

    let resp = t.app.clone().oneshot(empty_request("GET", "/restaurants")).await.unwrap();
    assert_eq!(body_json(resp).await["totalResults"], 0);

    let resp = t.app.clone().oneshot(empty_request("GET", &format!("/restaurants/{}", owner.id))).await.unwrap();
    let owned = body_json(resp).await;
    assert_eq!(owned.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_keeps_unsent_fields_and_appends_images() {
    let t = build_app(false);
    let owner = t.store.seed_user("Ana", "ana@example.com").await;
    let created = create_restaurant(&t, "Napoli", &owner.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    let body = multipart_body(&[("phone", "70000000")], &[("back.png", &b"png"[..])]);
    let resp = t.app.clone().oneshot(multipart_request("PUT", &format!("/restaurants/{id}"), body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["name"], "Napoli");
    assert_eq!(updated["phone"], "70000000");
    assert_eq!(updated["images"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_twice_gives_not_found() {
    let t = build_app(false);
    let owner = t.store.seed_user("Ana", "ana@example.com").await;
    let created = create_restaurant(&t, "Napoli", &owner.id.to_string()).await;
    let uri = format!("/restaurants/{}", created["id"].as_str().unwrap());

    let resp = t.app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = t.app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Restaurant not found");
}

#[tokio::test]
async fn health_and_metrics_are_served() {
    let t = build_app(false);
    let resp = t.app.clone().oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");

    let resp = t.app.clone().oneshot(empty_request("GET", "/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn bad_path_and_body_get_json_400s() {
    let t = build_app(false);

    let resp = t.app.clone().oneshot(empty_request("GET", "/restaurants/not-a-uuid")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["message"].is_string());

    let req = json_request("POST", "/restaurants", &json!({"name": "Napoli"}));
    let resp = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["message"].is_string());
}
