/// Page tests: cookie sessions, redirects and rendering
mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
};
use common::{contact_body, fixtures, TestApp};
use tower::util::ServiceExt;

async fn get(app: &TestApp, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_login(app: &TestApp, form: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn login_cookie(app: &TestApp, email: &str, password: &str) -> String {
    let response = post_login(app, &format!("email={email}&password={password}")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    set_cookie(&response)
}

#[tokio::test]
async fn test_pages_redirect_to_login_without_session() {
    let app = TestApp::new().await;

    for uri in ["/dashboard", "/contacts/1", "/users"] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login");
    }

    let response = get(&app, "/", None).await;
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_login_form_errors() {
    let app = TestApp::new().await;

    let response = post_login(&app, "email=&password=").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("Please enter both email and password."));

    let response = post_login(&app, "email=not-an-email&password=x").await;
    assert!(body_text(response)
        .await
        .contains("Please enter a valid email address."));

    let response = post_login(&app, "email=admin%40project2.com&password=wrong").await;
    let body = body_text(response).await;
    assert!(body.contains("Invalid email or password."));
    assert!(body.contains(r#"value="admin@project2.com""#));
}

#[tokio::test]
async fn test_unparseable_login_form_renders_page() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email":"admin@project2.com"}"#))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let body = body_text(response).await;
    assert!(body.contains("Invalid form data. Please try again."));
    assert!(body.contains(r#"<form method="post" action="/login">"#));
}

#[tokio::test]
async fn test_login_echo_is_escaped() {
    let app = TestApp::new().await;

    let response = post_login(&app, "email=%3Cscript%3E&password=x").await;
    let body = body_text(response).await;
    assert!(body.contains("&lt;script&gt;"));
    assert!(!body.contains("<script>"));
}

#[tokio::test]
async fn test_dashboard_after_login_and_logout() {
    let app = TestApp::new().await;
    let cookie = login_cookie(&app, "admin%40project2.com", fixtures::ADMIN_PASSWORD).await;

    let response = get(&app, "/login", Some(&cookie)).await;
    assert_eq!(location(&response), "/dashboard");

    let response = get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Dashboard"));
    assert!(body.contains("Admin User"));
    assert!(body.contains(r#"href="/users""#));

    let response = get(&app, "/logout", Some(&cookie)).await;
    assert_eq!(location(&response), "/login");

    let response = get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_users_page_flash_for_members() {
    let app = TestApp::new().await;
    app.create_member("Erin", "erin@example.com").await;
    let cookie = login_cookie(&app, "erin%40example.com", fixtures::MEMBER_PASSWORD).await;

    let response = get(&app, "/users", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    let flash = set_cookie(&response);
    assert!(flash.starts_with("dolphin_flash="));

    let both = format!("{cookie}; {flash}");
    let response = get(&app, "/dashboard", Some(&both)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cleared.contains("Max-Age=0"));
    assert!(body_text(response)
        .await
        .contains("Access denied. Administrator privileges required."));

    let admin = login_cookie(&app, "admin%40project2.com", fixtures::ADMIN_PASSWORD).await;
    let response = get(&app, "/users", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("erin@example.com"));
}

#[tokio::test]
async fn test_contact_page_renders_stored_text_once() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;

    let mut body = contact_body("Nellie", app.admin_id);
    body["company"] = serde_json::json!("Bertram & Sons");
    let (_, created) = app
        .json(Method::POST, "/api/contacts", Some(&token), Some(body))
        .await;
    let contact_id = created["contact_id"].as_i64().unwrap();

    app.json(
        Method::POST,
        &format!("/api/contacts/{contact_id}/notes"),
        Some(&token),
        Some(serde_json::json!({ "comment": "<b>bold</b>" })),
    )
    .await;

    let cookie = login_cookie(&app, "admin%40project2.com", fixtures::ADMIN_PASSWORD).await;
    let response = get(&app, &format!("/contacts/{contact_id}"), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;

    assert!(page.contains("Bertram &amp; Sons"));
    assert!(!page.contains("&amp;amp;"));
    assert!(page.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(page.contains("Admin User"));

    let response = get(&app, "/contacts/424242", Some(&cookie)).await;
    assert_eq!(location(&response), "/dashboard");
}
