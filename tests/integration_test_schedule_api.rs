mod common;

use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn calendar_config_reflects_settings() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/schedule/calendar-config", None, None)
        .await;
    assert_eq!(response.status(), 200);
    let body = parse_body(response).await;
    assert_eq!(body["seminar_from_date"], "2000-01-01");
    assert_eq!(body["min_time"], "0");
    assert_eq!(body["max_time"], "24");

    app.set_setting("seminar_from_date", "2024-07-01").await;
    app.set_setting("seminar_to_date", "2024-07-05").await;
    app.set_setting("min_time", "8").await;

    let response = app
        .request("GET", "/api/schedule/calendar-config", None, None)
        .await;
    let body = parse_body(response).await;
    assert_eq!(body["seminar_from_date"], "2024-07-01");
    assert_eq!(body["seminar_to_date"], "2024-07-05");
    assert_eq!(body["min_time"], "8");
}

#[tokio::test]
async fn schedule_endpoints_require_a_known_user() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/schedule/blocks", None, None).await;
    assert_eq!(response.status(), 400);
    let body = parse_body(response).await;
    assert_eq!(body["status"], "danger");
    assert_eq!(body["message"], "Missing X-User-Id header");

    let response = app
        .request("GET", "/api/schedule/blocks", Some("no-such-user"), None)
        .await;
    assert_eq!(response.status(), 404);
    let body = parse_body(response).await;
    assert_eq!(body["status"], "danger");
}

#[tokio::test]
async fn blocks_report_lectors_and_user_attendance() {
    let app = TestApp::new().await;
    let user = app.create_paid_user("alice").await;
    let lector = app.create_user("prof", true, false).await;

    let block = app
        .create_block(json!({
            "name": "Lecture",
            "category": "talk",
            "mandatory": true,
            "lector_ids": [lector]
        }))
        .await;
    let program = app.create_program(&block, "09:00", "10:00").await;

    let response = app
        .request("GET", "/api/schedule/blocks", Some(&user), None)
        .await;
    assert_eq!(response.status(), 200);
    let blocks = parse_body(response).await;
    let entry = blocks
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"] == block.as_str())
        .unwrap();
    assert_eq!(entry["mandatory"], true);
    assert_eq!(entry["user_allowed"], true);
    assert_eq!(entry["user_attends"], false);
    assert_eq!(entry["lectors_names"], json!(["prof"]));

    app.request(
        "PUT",
        &format!("/api/schedule/attend-program/{}", program),
        Some(&user),
        None,
    )
    .await;

    let response = app
        .request("GET", "/api/schedule/blocks", Some(&user), None)
        .await;
    let blocks = parse_body(response).await;
    let entry = blocks
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"] == block.as_str())
        .unwrap();
    assert_eq!(entry["user_attends"], true);
}

#[tokio::test]
async fn rooms_are_listed_for_the_schedule() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/v1/rooms",
            None,
            Some(json!({ "name": "Main hall" })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app.request("GET", "/api/schedule/rooms", None, None).await;
    assert_eq!(response.status(), 200);
    let rooms = parse_body(response).await;
    assert_eq!(rooms.as_array().unwrap().len(), 1);
    assert_eq!(rooms[0]["name"], "Main hall");
}

#[tokio::test]
async fn programs_expose_conflicts_and_blocked_state() {
    let app = TestApp::new().await;
    let user = app.create_paid_user("alice").await;

    let lecture = app.create_block(json!({ "name": "Lecture" })).await;
    let workshop = app.create_block(json!({ "name": "Workshop" })).await;
    let attended = app.create_program(&lecture, "09:00", "10:00").await;
    let overlapping = app.create_program(&workshop, "09:30", "10:30").await;
    let disjoint = app.create_program(&workshop, "14:00", "15:00").await;

    app.request(
        "PUT",
        &format!("/api/schedule/attend-program/{}", attended),
        Some(&user),
        None,
    )
    .await;

    let response = app
        .request("GET", "/api/schedule/programs", Some(&user), None)
        .await;
    assert_eq!(response.status(), 200);
    let programs = parse_body(response).await;
    let programs = programs.as_array().unwrap();
    let by_id = |id: &str| programs.iter().find(|p| p["id"] == id).unwrap();

    let entry = by_id(&attended);
    assert_eq!(entry["user_attends"], true);
    assert_eq!(entry["blocked"], false);
    assert_eq!(entry["attendees_count"], 1);
    assert!(entry["blocks"]
        .as_array()
        .unwrap()
        .contains(&json!(overlapping.as_str())));

    let entry = by_id(&overlapping);
    assert_eq!(entry["user_attends"], false);
    assert_eq!(entry["blocked"], true);

    let entry = by_id(&disjoint);
    assert_eq!(entry["blocked"], false);

    // Unattending clears the derived conflicts.
    app.request(
        "DELETE",
        &format!("/api/schedule/unattend-program/{}", attended),
        Some(&user),
        None,
    )
    .await;

    let response = app
        .request("GET", "/api/schedule/programs", Some(&user), None)
        .await;
    let programs = parse_body(response).await;
    let entry = programs
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == overlapping.as_str())
        .unwrap();
    assert_eq!(entry["blocked"], false);
}

#[tokio::test]
async fn paid_flag_is_scoped_to_the_block_subevent() {
    let app = TestApp::new().await;
    // Paid for the implicit subevent only.
    let user = app.create_paid_user("alice").await;

    let workshop_subevent = app.create_subevent("Workshop", Some(10)).await;
    let seminar_block = app.create_block(json!({ "name": "Lecture" })).await;
    let workshop_block = app
        .create_block(json!({ "name": "Woodcarving", "subevent_id": workshop_subevent }))
        .await;
    let seminar_program = app.create_program(&seminar_block, "09:00", "10:00").await;
    let workshop_program = app.create_program(&workshop_block, "14:00", "15:00").await;

    let response = app
        .request("GET", "/api/schedule/programs", Some(&user), None)
        .await;
    let programs = parse_body(response).await;
    let programs = programs.as_array().unwrap();
    let by_id = |id: &str| programs.iter().find(|p| p["id"] == id).unwrap();

    assert_eq!(by_id(&seminar_program)["paid"], true);
    assert_eq!(by_id(&workshop_program)["paid"], false);

    // Attending across the unpaid subevent is refused.
    let response = app
        .request(
            "PUT",
            &format!("/api/schedule/attend-program/{}", workshop_program),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(response.status(), 402);
}
