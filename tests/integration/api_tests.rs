//! API integration tests against a running server

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

async fn register_member(client: &Client, name: &str) -> Value {
    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({
            "name": name,
            "address": "2-3 Kita, Sapporo",
            "phone_number": "011-000-0000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse member")
}

async fn register_book(client: &Client, title: &str) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!([{ "title": title, "author": "Miyazawa Kenji", "genre": 8 }]))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let books: Vec<Value> = response.json().await.expect("Failed to parse books");
    books.into_iter().next().expect("one book registered")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_member_lifecycle() {
    let client = Client::new();
    let member = register_member(&client, "Miyazawa").await;
    let id = member["id"].as_str().unwrap();

    let response = client
        .patch(format!("{}/members/{}", BASE_URL, id))
        .json(&json!({ "address": "Hanamaki" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let fetched: Value = client
        .get(format!("{}/members/{}", BASE_URL, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["address"], "Hanamaki");
    assert_eq!(fetched["name"], "Miyazawa");

    let response = client
        .delete(format!("{}/members/{}", BASE_URL, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/members/{}", BASE_URL, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_lend_conflict_and_return() {
    let client = Client::new();
    let first = register_member(&client, "Giovanni").await;
    let second = register_member(&client, "Campanella").await;
    let book = register_book(&client, "銀河鉄道の夜").await;
    let book_id = book["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/lendings", BASE_URL))
        .json(&json!({ "member_id": first["id"], "book_ids": [book_id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let lendings: Vec<Value> = response.json().await.unwrap();
    assert_eq!(lendings[0]["book_title"], "銀河鉄道の夜");
    assert_eq!(lendings[0]["member_name"], "Giovanni");

    let response = client
        .post(format!("{}/lendings", BASE_URL))
        .json(&json!({ "member_id": second["id"], "book_ids": [book_id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 7);

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(book["lending"], true);

    let response = client
        .post(format!("{}/lendings/return", BASE_URL))
        .json(&json!({ "member_id": first["id"], "book_ids": [book_id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .post(format!("{}/lendings", BASE_URL))
        .json(&json!({ "member_id": second["id"], "book_ids": [book_id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore]
async fn test_search_by_title_substring() {
    let client = Client::new();
    register_book(&client, "注文の多い料理店").await;

    let response = client
        .get(format!("{}/books", BASE_URL))
        .query(&[("title", "多い料理")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page: Value = response.json().await.unwrap();
    assert!(page["total"].as_i64().unwrap() >= 1);
    let titles: Vec<&str> = page["books"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|b| b["title"].as_str())
        .collect();
    assert!(titles.iter().all(|t| t.contains("多い料理")));
}

#[tokio::test]
#[ignore]
async fn test_initialize_reloads_counters() {
    let client = Client::new();

    let response = client
        .post(format!("{}/initialize", BASE_URL))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["genres"].as_array().unwrap().len(), 10);
}
