use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

const BLUE_BOTTLE_FORM: &str = "cafe_name=Blue+Bottle\
&map_url=https%3A%2F%2Fmaps.example%2F1\
&image_url=https%3A%2F%2Fimg.example%2F1\
&location=Downtown\
&seats=10-20\
&has_sockets=Yes&has_toilet=No&has_wifi=Yes&can_take_calls=No\
&coffee_price=%244";

fn unique_sqlite_path(prefix: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "brewdex-{prefix}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    temp_path
}

async fn build_app(prefix: &str) -> (axum::Router, brewdex::db::DbHandle, std::path::PathBuf) {
    let temp_path = unique_sqlite_path(prefix);
    let db = brewdex::db::spawn(&format!("sqlite:{}", temp_path.display())).await;
    let state = brewdex::server::router::AppState::new(db.clone(), true);
    let app = brewdex::server::router::brewdex_router(state);
    (app, db, temp_path)
}

fn cookie_header_from_set_cookie_headers(headers: &axum::http::HeaderMap) -> String {
    let mut pairs: Vec<String> = Vec::new();
    for v in headers.get_all(header::SET_COOKIE).iter() {
        let s = v.to_str().expect("set-cookie header was not valid utf-8");
        let first = s.split(';').next().unwrap_or("");
        let mut parts = first.splitn(2, '=');
        let name = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        if !name.trim().is_empty() && !value.is_empty() {
            pairs.push(format!("{}={}", name.trim(), value));
        }
    }
    pairs.join("; ")
}

fn request(method: &str, uri: &str, body: Option<&str>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .expect("failed to build request")
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body was not valid json")
}

/// Registers an account and returns its session cookie header. The first
/// registration in a fresh database gets id 1, the admin.
async fn register_session(app: &axum::Router, name: &str, email: &str) -> String {
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/register",
            Some(&format!("name={name}&email={email}&password=pw1")),
            None,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    cookie_header_from_set_cookie_headers(resp.headers())
}

#[tokio::test]
async fn anonymous_and_non_admin_users_get_a_bare_403() {
    let (app, _db, temp_path) = build_app("gate").await;

    // Anonymous: every admin route is a hard stop.
    for (method, uri) in [
        ("GET", "/add"),
        ("POST", "/add"),
        ("GET", "/edit-cafe/1"),
        ("POST", "/edit-cafe/1"),
        ("PATCH", "/edit-cafe/1"),
        ("GET", "/delete-cafe/1"),
        ("DELETE", "/delete-cafe/1"),
    ] {
        let body = (method != "GET").then_some(BLUE_BOTTLE_FORM);
        let resp = app
            .clone()
            .oneshot(request(method, uri, body, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{method} {uri}");
    }

    let _admin = register_session(&app, "Ann", "ann@x.com").await;
    let bob = register_session(&app, "Bob", "bob@x.com").await;

    // The second registrant is logged in but still not the admin.
    let resp = app
        .clone()
        .oneshot(request("POST", "/add", Some(BLUE_BOTTLE_FORM), Some(&bob)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn admin_creates_edits_and_deletes_a_cafe() {
    let (app, db, temp_path) = build_app("admin-crud").await;
    let admin = register_session(&app, "Ann", "ann@x.com").await;

    // Create.
    let resp = app
        .clone()
        .oneshot(request("POST", "/add", Some(BLUE_BOTTLE_FORM), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        "/all"
    );

    // The listing is public and includes the new record with every field.
    let all = app.clone().oneshot(request("GET", "/all", None, None)).await.unwrap();
    assert_eq!(all.status(), StatusCode::OK);
    let listing = json_body(all).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["name"], "Blue Bottle");
    assert_eq!(listing[0]["map_url"], "https://maps.example/1");
    assert_eq!(listing[0]["img_url"], "https://img.example/1");
    assert_eq!(listing[0]["location"], "Downtown");
    assert_eq!(listing[0]["seats"], "10-20");
    assert_eq!(listing[0]["has_wifi"], "Yes");
    assert_eq!(listing[0]["has_toilet"], "No");
    assert_eq!(listing[0]["has_sockets"], "Yes");
    assert_eq!(listing[0]["can_take_calls"], "No");
    assert_eq!(listing[0]["coffee_price"], "$4");
    let id = listing[0]["id"].as_i64().unwrap();

    // The edit form is pre-populated from the stored record.
    let form_page = app
        .clone()
        .oneshot(request("GET", &format!("/edit-cafe/{id}"), None, Some(&admin)))
        .await
        .unwrap();
    assert_eq!(form_page.status(), StatusCode::OK);
    let descriptor = json_body(form_page).await;
    assert_eq!(descriptor["values"]["cafe_name"], "Blue Bottle");
    assert_eq!(descriptor["values"]["image_url"], "https://img.example/1");

    // Edit: full replace of all fields.
    let edited = "cafe_name=Blue+Bottle+Annex\
&map_url=https%3A%2F%2Fmaps.example%2F2\
&image_url=https%3A%2F%2Fimg.example%2F2\
&location=Uptown\
&seats=50%2B\
&has_sockets=No&has_toilet=Yes&has_wifi=No&can_take_calls=Yes\
&coffee_price=%245.50";
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/edit-cafe/{id}"),
            Some(edited),
            Some(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let stored = db.get_cafe(id).await.unwrap();
    assert_eq!(stored.name, "Blue Bottle Annex");
    assert_eq!(stored.seats, "50+");
    assert_eq!(stored.has_wifi, "No");
    assert_eq!(stored.coffee_price, "$5.50");

    // Delete, then the record is gone.
    let resp = app
        .clone()
        .oneshot(request("GET", &format!("/delete-cafe/{id}"), None, Some(&admin)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(db.list_cafes().await.unwrap().is_empty());

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn invalid_cafe_submission_is_rejected_per_field_without_persisting() {
    let (app, db, temp_path) = build_app("admin-invalid").await;
    let admin = register_session(&app, "Ann", "ann@x.com").await;

    let bad = "cafe_name=Blue+Bottle&map_url=not-a-url&seats=9000&coffee_price=%244";
    let resp = app
        .clone()
        .oneshot(request("POST", "/add", Some(bad), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(body["error"]["details"]["fields"]["map_url"], "Invalid URL.");
    assert_eq!(
        body["error"]["details"]["fields"]["seats"],
        "Not a valid choice."
    );
    assert_eq!(
        body["error"]["details"]["fields"]["location"],
        "This field is required."
    );
    assert_eq!(body["error"]["details"]["values"]["map_url"], "not-a-url");

    assert!(db.list_cafes().await.unwrap().is_empty());

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn duplicate_cafe_name_via_route_is_a_409() {
    let (app, db, temp_path) = build_app("admin-dup").await;
    let admin = register_session(&app, "Ann", "ann@x.com").await;

    let resp = app
        .clone()
        .oneshot(request("POST", "/add", Some(BLUE_BOTTLE_FORM), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = app
        .clone()
        .oneshot(request("POST", "/add", Some(BLUE_BOTTLE_FORM), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "DUPLICATE_CAFE_NAME");

    assert_eq!(db.list_cafes().await.unwrap().len(), 1);

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn edit_and_delete_of_missing_ids_are_404() {
    let (app, _db, temp_path) = build_app("admin-missing").await;
    let admin = register_session(&app, "Ann", "ann@x.com").await;

    let resp = app
        .clone()
        .oneshot(request("GET", "/edit-cafe/42", None, Some(&admin)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/edit-cafe/42",
            Some(BLUE_BOTTLE_FORM),
            Some(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(request("DELETE", "/delete-cafe/42", None, Some(&admin)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let _ = std::fs::remove_file(&temp_path);
}
