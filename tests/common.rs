use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use seminar_backend::{
    api::router::create_router,
    config::Config,
    infra::factory::{build_state, run_migrations},
    state::AppState,
};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_migrations(&pool).await;

        let config = Config {
            database_url: db_url,
            port: 0,
        };

        let state = Arc::new(build_state(&config, pool.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        user_id: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header("X-User-Id", user_id);
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn create_user(&self, name: &str, approved: bool, allowed: bool) -> String {
        let response = self
            .request(
                "POST",
                "/api/v1/users",
                None,
                Some(json!({
                    "name": name,
                    "approved": approved,
                    "allowed_register_programs": allowed
                })),
            )
            .await;
        assert!(response.status().is_success(), "create_user failed");
        parse_body(response).await["id"].as_str().unwrap().to_string()
    }

    pub async fn create_subevent(&self, name: &str, capacity: Option<i64>) -> String {
        let response = self
            .request(
                "POST",
                "/api/v1/subevents",
                None,
                Some(json!({ "name": name, "capacity": capacity })),
            )
            .await;
        assert!(response.status().is_success(), "create_subevent failed");
        parse_body(response).await["id"].as_str().unwrap().to_string()
    }

    pub async fn implicit_subevent_id(&self) -> String {
        let response = self.request("GET", "/api/v1/subevents", None, None).await;
        let subevents = parse_body(response).await;
        subevents
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["implicit"].as_bool().unwrap())
            .expect("no implicit subevent")["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn create_block(&self, body: Value) -> String {
        let response = self.request("POST", "/api/v1/blocks", None, Some(body)).await;
        assert!(response.status().is_success(), "create_block failed");
        parse_body(response).await["id"].as_str().unwrap().to_string()
    }

    /// Program on 2024-07-01 between the given hours.
    pub async fn create_program(&self, block_id: &str, start: &str, end: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/v1/programs",
                None,
                Some(json!({
                    "block_id": block_id,
                    "start": format!("2024-07-01T{}:00Z", start),
                    "end": format!("2024-07-01T{}:00Z", end)
                })),
            )
            .await;
        assert!(response.status().is_success(), "create_program failed");
        parse_body(response).await["id"].as_str().unwrap().to_string()
    }

    pub async fn create_application(&self, user_id: &str, subevent_id: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/v1/applications",
                None,
                Some(json!({ "user_id": user_id, "subevent_id": subevent_id })),
            )
            .await;
        assert!(response.status().is_success(), "create_application failed");
        parse_body(response).await["id"].as_str().unwrap().to_string()
    }

    pub async fn set_application_state(&self, application_id: &str, state: &str) {
        let response = self
            .request(
                "PUT",
                &format!("/api/v1/applications/{}/state", application_id),
                None,
                Some(json!({ "state": state })),
            )
            .await;
        assert!(response.status().is_success(), "set_application_state failed");
    }

    pub async fn set_setting(&self, key: &str, value: &str) {
        let response = self
            .request(
                "PUT",
                &format!("/api/v1/settings/{}", key),
                None,
                Some(json!({ "value": value })),
            )
            .await;
        assert!(response.status().is_success(), "set_setting failed");
    }

    /// Approved user with a paid application in the implicit subevent.
    pub async fn create_paid_user(&self, name: &str) -> String {
        let user_id = self.create_user(name, true, true).await;
        let implicit = self.implicit_subevent_id().await;
        let application_id = self.create_application(&user_id, &implicit).await;
        self.set_application_state(&application_id, "PAID").await;
        user_id
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
