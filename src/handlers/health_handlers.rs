//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that checks the drone store and the upload directory

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::HashMap;
use tokio::fs;
use uuid::Uuid;

/// `GET /healthz`
///
/// Liveness probe. Always 200 and never performs I/O.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /readyz`
///
/// Readiness probe that:
/// 1. Pings the drone store.
/// 2. Performs a write/read/delete round trip inside the upload directory.
///
/// HTTP 200 when both checks pass, HTTP 503 otherwise.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let store_check = match state.drones.ping().await {
        Ok(()) => CheckStatus::ok(),
        Err(e) => CheckStatus::failed(format!("error: {}", e)),
    };

    let upload_dir = state.uploads.upload_dir();
    let tmp_path = upload_dir.join(format!(".readyz-{}", Uuid::new_v4()));
    let disk_check = match fs::create_dir_all(upload_dir).await {
        Err(e) => CheckStatus::failed(format!("could not create upload dir: {}", e)),
        Ok(()) => match fs::write(&tmp_path, b"readyz").await {
            Err(e) => CheckStatus::failed(format!("could not write tmp file: {}", e)),
            Ok(()) => {
                let read = fs::read(&tmp_path).await;
                let removed = fs::remove_file(&tmp_path).await;
                match (read, removed) {
                    (Ok(bytes), _) if bytes != b"readyz" => {
                        CheckStatus::failed("file content mismatch".to_string())
                    }
                    (Ok(_), Ok(())) => CheckStatus::ok(),
                    (Ok(_), Err(e)) => CheckStatus {
                        ok: true,
                        error: Some(format!("could not remove tmp file: {}", e)),
                    },
                    (Err(e), _) => CheckStatus::failed(format!("could not read tmp file: {}", e)),
                }
            }
        },
    };

    let overall_ok = store_check.ok && disk_check.ok;

    let mut checks = HashMap::new();
    checks.insert("store", store_check);
    checks.insert("disk", disk_check);

    let body = ReadyResponse {
        status: if overall_ok {
            "ok".into()
        } else {
            "error".into()
        },
        checks,
    };

    let status = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}

impl CheckStatus {
    fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            ok: false,
            error: Some(error),
        }
    }
}
