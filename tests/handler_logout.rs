mod common;

use axum::http::StatusCode;
use common::location;

#[tokio::test]
async fn test_logout_ends_session() {
    let server = common::create_test_server();
    let cookie = common::sign_in(&server).await;

    let response = server.post("/logout").add_header("Cookie", cookie.clone()).await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let cleared = response.header("set-cookie");
    let cleared = cleared.to_str().unwrap();
    assert!(cleared.starts_with("moltly_session=;"));
    assert!(cleared.contains("Max-Age=0"));

    let after = server.get("/").add_header("Cookie", cookie).await;
    after.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&after), "/login");
}

#[tokio::test]
async fn test_logout_without_session() {
    let server = common::create_test_server();

    let response = server.post("/logout").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}
