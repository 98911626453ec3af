//! Video upload and download handlers.
//! Multipart bodies are streamed straight to `UploadService` without being
//! buffered in memory.

use crate::{errors::AppError, services::upload_service::UploadError, state::AppState};
use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use futures::TryStreamExt;
use serde::Serialize;
use std::io;
use tokio_util::io::ReaderStream;

/// Multipart field that carries the video.
const VIDEO_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub identifier: String,
    pub download_uri: String,
}

/// POST `/drone/uploadVideo`
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.body_text()))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or(UploadError::MissingVideo)?;

        let stream = field.map_err(io::Error::other);
        let saved = state.uploads.save_file(&filename, stream).await?;

        return Ok(Json(UploadResponse {
            download_uri: saved.download_uri(),
            identifier: saved.identifier,
        }));
    }

    Err(UploadError::MissingVideo.into())
}

/// GET `/drone/downloadVideo/{filename}`: stream a stored video back.
pub async fn download_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let (file, len) = state.uploads.open(&filename).await?;
    let body = Body::from_stream(ReaderStream::new(file));

    let content_type = if filename.ends_with(".mp4") {
        "video/mp4"
    } else {
        "application/octet-stream"
    };

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    if let Ok(value) = HeaderValue::from_str(&content_disposition(&filename)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

/// `attachment` disposition with an ASCII `filename` fallback and the exact
/// name in `filename*` (RFC 6266).
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    let mut encoded = String::with_capacity(filename.len());
    for byte in filename.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_passed_through() {
        assert_eq!(
            content_disposition("clip.mp4"),
            "attachment; filename=\"clip.mp4\"; filename*=UTF-8''clip.mp4"
        );
    }

    #[test]
    fn quotes_cannot_break_out_of_the_filename_parameter() {
        let value = content_disposition("a\"; filename=\"evil.exe");
        assert_eq!(
            value,
            "attachment; filename=\"a_; filename=_evil.exe\"; \
             filename*=UTF-8''a%22%3B%20filename%3D%22evil.exe"
        );
        assert!(HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn non_ascii_names_are_percent_encoded() {
        let value = content_disposition("vôo.mp4");
        assert_eq!(
            value,
            "attachment; filename=\"v_o.mp4\"; filename*=UTF-8''v%C3%B4o.mp4"
        );
    }
}
