use serde_json::{json, Value};
use sqlx::Row;

use crate::helpers::{post_subscription, TestApp};

#[tokio::test]
async fn subscribe_returns_200_when_body_is_valid() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.subscribe("frank@test.com").await;

    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();

    assert_eq!(body["email"], "frank@test.com");
    assert!(body["id"].is_i64());
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    let test_app = TestApp::spawn_app().await;

    test_app.subscribe("test@test.com").await;

    let row = sqlx::query("SELECT id, email FROM subscribers;")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Query to fetch subscribers failed.");
    let email: String = row.get("email");

    assert_eq!(email, "test@test.com");
}

#[tokio::test]
async fn subscribed_email_is_listed_exactly_once() {
    let test_app = TestApp::spawn_app().await;

    test_app.subscribe("frank@test.com").await;

    let emails = test_app.get_subscriber_emails("").await;

    assert_eq!(emails, vec![String::from("frank@test.com")]);
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_already_registered() {
    let test_app = TestApp::spawn_app().await;

    let first_response = test_app.subscribe("frank@test.com").await;
    let second_response = test_app.subscribe("frank@test.com").await;

    assert_eq!(200, first_response.status().as_u16());
    assert_eq!(400, second_response.status().as_u16());

    let body: Value = second_response.json().await.unwrap();

    assert_eq!(body, json!({ "detail": "Email already registered" }));
    assert_eq!(test_app.get_subscriber_emails("").await.len(), 1);
}

#[tokio::test]
async fn emails_differing_only_in_case_are_different_subscribers() {
    let test_app = TestApp::spawn_app().await;

    let first_response = test_app.subscribe("frank@test.com").await;
    let second_response = test_app.subscribe("Frank@test.com").await;

    assert_eq!(200, first_response.status().as_u16());
    assert_eq!(200, second_response.status().as_u16());
}

#[tokio::test]
async fn concurrent_subscriptions_with_the_same_email_store_one_subscriber() {
    let test_app = TestApp::spawn_app().await;

    let (first_response, second_response) = tokio::join!(
        test_app.subscribe("race@test.com"),
        test_app.subscribe("race@test.com")
    );

    let mut statuses = vec![
        first_response.status().as_u16(),
        second_response.status().as_u16(),
    ];
    statuses.sort();

    assert_eq!(statuses, vec![200, 400]);
    assert_eq!(
        test_app.get_subscriber_emails("").await,
        vec![String::from("race@test.com")]
    );
}

#[tokio::test]
async fn subscribe_returns_422_when_body_is_present_but_not_valid() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 422.
    let test_cases = vec![
        (json!({ "email": "not-an-email" }), "plain word as email"),
        (json!({ "email": "test.com" }), "missing @ symbol"),
        (json!({ "email": "@test.com" }), "missing subject"),
        (json!({ "email": "" }), "empty email"),
        (json!({ "email": "frank@localhost" }), "domain without a dot"),
        (json!({ "email": "a@b" }), "single label domain"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscription(invalid_body).await;

        assert_eq!(
            422,
            response.status().as_u16(),
            "The API did not fail with 422 status when payload was {}",
            error_message
        );

        let body: Value = response.json().await.unwrap();

        assert!(body["detail"].is_string());
    }

    let stored = sqlx::query("SELECT COUNT(*) AS total FROM subscribers;")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Query to count subscribers failed.")
        .get::<i64, _>("total");

    assert_eq!(stored, 0);
}

#[tokio::test]
async fn subscribe_returns_422_when_body_require_field_is_missing() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (json!({}), "missing body parameters"),
        (json!({ "name": "Frank" }), "missing email parameter"),
        (json!({ "email": 42 }), "email is not a string"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscription(invalid_body).await;

        assert_eq!(
            422,
            response.status().as_u16(),
            "The API did not fail with 422 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn subscribe_returns_500_when_storage_is_down() {
    let address = TestApp::spawn_app_without_storage().await;

    let response = post_subscription(&address, json!({ "email": "frank@test.com" })).await;

    assert_eq!(500, response.status().as_u16());

    let body: Value = response.json().await.unwrap();

    assert_eq!(body, json!({ "detail": "Internal server error" }));
}

#[tokio::test]
async fn malformed_email_is_rejected_even_when_storage_is_down() {
    let address = TestApp::spawn_app_without_storage().await;

    let response = post_subscription(&address, json!({ "email": "not-an-email" })).await;

    assert_eq!(422, response.status().as_u16());
}
