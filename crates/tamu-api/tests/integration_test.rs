// Integration tests for the Tamu API
// Run against a live server: cargo test --test integration_test -- --ignored
//
// Requires a running tamu-api with a clean database, plus ADMIN_EMAIL /
// ADMIN_PASSWORD matching the TEST_ADMIN_* values below.

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};

const API_BASE_URL: &str = "http://localhost:5000";
const WS_URL: &str = "ws://localhost:5000/v1/live";
const TEST_ADMIN_EMAIL: &str = "admin@kampus.test";
const TEST_ADMIN_PASSWORD: &str = "admin123";

async fn login(client: &reqwest::Client) -> String {
    let response = client
        .post(format!("{}/v1/auth/login", API_BASE_URL))
        .json(&json!({
            "email": TEST_ADMIN_EMAIL,
            "password": TEST_ADMIN_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse login");
    body["token"].as_str().expect("token missing").to_string()
}

async fn create_event(client: &reqwest::Client, token: &str, slug: &str) -> i64 {
    let response = client
        .post(format!("{}/v1/events", API_BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": "Open Campus Day 2024",
            "slug": slug,
            "description": "Annual open campus",
            "date": "2024-12-15T09:00:00Z",
            "location": "Main Auditorium",
        }))
        .send()
        .await
        .expect("Failed to create event");
    assert_eq!(response.status(), 201, "create event should return 201");
    let event: Value = response.json().await.expect("Failed to parse event");
    event["id"].as_i64().expect("event id missing")
}

#[tokio::test]
#[ignore]
async fn test_submit_then_fetch_round_trip() {
    let client = reqwest::Client::new();
    let token = login(&client).await;
    let slug = format!("round-trip-{}", std::process::id());
    let event_id = create_event(&client, &token, &slug).await;

    // Submit a check-in
    let response = client
        .post(format!("{}/v1/attendance", API_BASE_URL))
        .json(&json!({
            "event_slug": slug,
            "guest_name": "Ana Putri",
            "institution": "Universitas Dumai",
            "position": "Lecturer",
            "representative_count": 3,
            "category": "official_invitation",
        }))
        .send()
        .await
        .expect("Failed to submit attendance");
    assert_eq!(response.status(), 201);
    let record: Value = response.json().await.expect("Failed to parse record");

    let id = record["id"].as_i64().expect("id missing");
    assert!(id > 0, "id should be a positive integer");
    assert_eq!(record["guest_name"], "Ana Putri");
    assert_eq!(record["event_slug"], slug.as_str());

    // A second identical submission conflicts, and case changes don't dodge it
    let response = client
        .post(format!("{}/v1/attendance", API_BASE_URL))
        .json(&json!({
            "event_slug": slug,
            "guest_name": "ana putri",
            "institution": "UNIVERSITAS DUMAI",
        }))
        .send()
        .await
        .expect("Failed to submit duplicate");
    assert_eq!(response.status(), 409);

    // The backlog returns identical guest-field values
    let response = client
        .get(format!(
            "{}/v1/attendance/event/{}?page_size=1000",
            API_BASE_URL, event_id
        ))
        .send()
        .await
        .expect("Failed to fetch backlog");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse backlog");
    let fetched = body["data"]
        .as_array()
        .expect("data missing")
        .iter()
        .find(|r| r["id"] == record["id"])
        .expect("submitted record missing from backlog");
    for field in [
        "guest_name",
        "institution",
        "position",
        "representative_count",
        "category",
    ] {
        assert_eq!(fetched[field], record[field], "field {field} mutated");
    }
}

#[tokio::test]
#[ignore]
async fn test_submission_for_unknown_event_is_404() {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/v1/attendance", API_BASE_URL))
        .json(&json!({
            "event_slug": "no-such-event-slug",
            "guest_name": "Ana Putri",
            "institution": "Universitas Dumai",
        }))
        .send()
        .await
        .expect("Failed to submit");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_validation_rejects_out_of_range_count() {
    let client = reqwest::Client::new();
    let token = login(&client).await;
    let slug = format!("validation-{}", std::process::id());
    create_event(&client, &token, &slug).await;

    let response = client
        .post(format!("{}/v1/attendance", API_BASE_URL))
        .json(&json!({
            "event_slug": slug,
            "guest_name": "Ana Putri",
            "institution": "Universitas Dumai",
            "representative_count": 101,
        }))
        .send()
        .await
        .expect("Failed to submit");
    assert_eq!(response.status(), 400);
}

/// Two displays join one event's room; a third joins another. A submission
/// reaches exactly the two subscribed displays.
#[tokio::test]
#[ignore]
async fn test_live_fanout_is_room_scoped() {
    let client = reqwest::Client::new();
    let token = login(&client).await;
    let pid = std::process::id();
    let slug_a = format!("fanout-a-{pid}");
    let slug_b = format!("fanout-b-{pid}");
    let event_a = create_event(&client, &token, &slug_a).await;
    let event_b = create_event(&client, &token, &slug_b).await;

    let mut displays = Vec::new();
    for event_id in [event_a, event_a, event_b] {
        let (mut ws, _) = connect_async(WS_URL).await.expect("ws connect failed");
        ws.send(Message::Text(
            json!({"type": "join", "event_id": event_id}).to_string().into(),
        ))
        .await
        .expect("join send failed");
        // Consume the join ack
        let ack = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("no join ack")
            .expect("ws closed")
            .expect("ws error");
        let ack: Value = serde_json::from_str(ack.to_text().unwrap()).unwrap();
        assert_eq!(ack["type"], "joined");
        displays.push(ws);
    }

    let response = client
        .post(format!("{}/v1/attendance", API_BASE_URL))
        .json(&json!({
            "event_slug": slug_a,
            "guest_name": "Budi Santoso",
            "institution": "SMA Negeri 1 Dumai",
        }))
        .send()
        .await
        .expect("Failed to submit");
    assert_eq!(response.status(), 201);
    let record: Value = response.json().await.unwrap();

    // Both event-A displays receive the push
    for ws in &mut displays[..2] {
        let frame = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("no push received")
            .expect("ws closed")
            .expect("ws error");
        let push: Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();
        assert_eq!(push["type"], "new-attendance");
        assert_eq!(push["data"]["id"], record["id"]);
        assert_eq!(push["data"]["guest_name"], "Budi Santoso");
    }

    // The event-B display receives nothing
    let nothing = tokio::time::timeout(Duration::from_millis(500), displays[2].next()).await;
    assert!(nothing.is_err(), "event-B display should not receive the push");
}

#[tokio::test]
#[ignore]
async fn test_institution_delete_blocked_while_in_use() {
    let client = reqwest::Client::new();
    let token = login(&client).await;
    let pid = std::process::id();
    let slug = format!("inst-delete-{pid}");
    create_event(&client, &token, &slug).await;

    let response = client
        .post(format!("{}/v1/institutions", API_BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"name": format!("Politeknik Dumai {pid}"), "kind": "university"}))
        .send()
        .await
        .expect("Failed to create institution");
    assert_eq!(response.status(), 201);
    let institution: Value = response.json().await.unwrap();
    let institution_id = institution["id"].as_i64().unwrap();

    // Check a guest in under that institution name
    let response = client
        .post(format!("{}/v1/attendance", API_BASE_URL))
        .json(&json!({
            "event_slug": slug,
            "guest_name": "Citra Lestari",
            "institution": format!("Politeknik Dumai {pid}"),
        }))
        .send()
        .await
        .expect("Failed to submit");
    assert_eq!(response.status(), 201);

    // Renaming doesn't orphan the protection
    let response = client
        .put(format!("{}/v1/institutions/{}", API_BASE_URL, institution_id))
        .bearer_auth(&token)
        .json(&json!({"name": format!("Politeknik Negeri Dumai {pid}"), "kind": "university"}))
        .send()
        .await
        .expect("Failed to rename");
    assert_eq!(response.status(), 200);

    let response = client
        .delete(format!("{}/v1/institutions/{}", API_BASE_URL, institution_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete");
    assert_eq!(response.status(), 409, "delete should stay blocked after rename");
}
