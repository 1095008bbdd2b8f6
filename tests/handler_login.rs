mod common;

use axum::http::StatusCode;
use common::{COOKIE_NAME, EMAIL, PASSWORD, location};

#[tokio::test]
async fn test_login_page_renders_form() {
    let server = common::create_test_server();

    let response = server.get("/login").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains(r#"action="/login""#));
    assert!(body.contains(r#"name="callbackUrl" value="/""#));
    assert!(body.contains("Continue with Discord"));
    assert!(body.contains(r#"action="/login/federated/discord""#));
    assert!(body.contains(r#"href="/register""#));
}

#[tokio::test]
async fn test_login_page_keeps_same_origin_callback() {
    let server = common::create_test_server();

    let response = server
        .get("/login")
        .add_query_param("callbackUrl", "https://moltly.app/molts")
        .await;

    response.assert_status_ok();
    assert!(response.text().contains(r#"name="callbackUrl" value="/molts""#));
}

#[tokio::test]
async fn test_login_page_drops_foreign_callbacks() {
    let server = common::create_test_server();

    for raw in [
        "https://evil.com/x",
        "//evil.com",
        "/\\evil.com",
        "javascript:alert(1)",
    ] {
        let response = server.get("/login").add_query_param("callbackUrl", raw).await;

        response.assert_status_ok();
        assert!(
            response.text().contains(r#"name="callbackUrl" value="/""#),
            "callback {raw:?} was not replaced"
        );
    }
}

#[tokio::test]
async fn test_login_success_redirects_to_callback() {
    let server = common::create_test_server();

    let response = server
        .post("/login")
        .form(&[
            ("email", EMAIL),
            ("password", PASSWORD),
            ("callbackUrl", "/molts"),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/molts");

    let cookie = response.header("set-cookie");
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with(&format!("{COOKIE_NAME}=")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn test_login_success_ignores_tampered_callback() {
    let server = common::create_test_server();

    let response = server
        .post("/login")
        .form(&[
            ("email", EMAIL),
            ("password", PASSWORD),
            ("callbackUrl", "//evil.com/steal"),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_login_success_percent_encodes_non_ascii_callback() {
    let server = common::create_test_server();

    let response = server
        .post("/login")
        .form(&[
            ("email", EMAIL),
            ("password", PASSWORD),
            ("callbackUrl", "/spiders/ü"),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/spiders/%C3%BC");
}

#[tokio::test]
async fn test_login_success_never_redirects_off_site_via_dot_segments() {
    let server = common::create_test_server();

    let response = server
        .post("/login")
        .form(&[
            ("email", EMAIL),
            ("password", PASSWORD),
            ("callbackUrl", "/.//evil.com/é"),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let server = common::create_test_server();

    let response = server
        .post("/login")
        .form(&[("email", "Keeper@Moltly.App"), ("password", PASSWORD)])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_login_wrong_password_shows_reason() {
    let server = common::create_test_server();

    let response = server
        .post("/login")
        .form(&[
            ("email", EMAIL),
            ("password", "wrong"),
            ("callbackUrl", "/molts"),
        ])
        .await;

    response.assert_status_unauthorized();
    assert!(response.headers().get("set-cookie").is_none());

    let body = response.text();
    assert!(body.contains("CredentialsSignin"));
    assert!(body.contains(&format!(r#"value="{EMAIL}""#)));
    assert!(body.contains(r#"name="callbackUrl" value="/molts""#));
    assert!(!body.contains("wrong"));
}

#[tokio::test]
async fn test_login_invalid_email_rejected_before_sign_in() {
    let server = common::create_test_server();

    let response = server
        .post("/login")
        .form(&[("email", "not-an-email"), ("password", PASSWORD)])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text();
    assert!(body.contains("Enter a valid email address."));
    assert!(body.contains(r#"value="not-an-email""#));
}

#[tokio::test]
async fn test_login_empty_password_rejected() {
    let server = common::create_test_server();

    let response = server
        .post("/login")
        .form(&[("email", EMAIL), ("password", "")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("Enter your password."));
}

#[tokio::test]
async fn test_federated_login_hands_off_with_absolute_callback() {
    let server = common::create_test_server();

    let response = server
        .post("/login/federated/discord")
        .form(&[("callbackUrl", "/molts")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "https://discord.com/oauth2/authorize?callbackUrl=https%3A%2F%2Fmoltly.app%2Fmolts"
    );
}

#[tokio::test]
async fn test_federated_login_sanitizes_callback() {
    let server = common::create_test_server();

    let response = server
        .post("/login/federated/discord")
        .form(&[("callbackUrl", "https://evil.com/")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "https://discord.com/oauth2/authorize?callbackUrl=https%3A%2F%2Fmoltly.app%2F"
    );
}

#[tokio::test]
async fn test_federated_login_unknown_provider() {
    let server = common::create_test_server();

    let response = server
        .post("/login/federated/myspace")
        .form(&[("callbackUrl", "/molts")])
        .await;

    response.assert_status_unauthorized();
    let body = response.text();
    assert!(body.contains("OAuthSignin"));
    assert!(body.contains(r#"name="callbackUrl" value="/molts""#));
}
