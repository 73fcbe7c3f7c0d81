//! HTTP upload endpoint.
//!
//! `POST /excel_converter/xml_to_xlsx` takes a multipart form with a
//! `file` field holding a Tally XML export and answers with the converted
//! workbook as an attachment. Errors are JSON objects with a `message`.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::convert::convert_with;
use crate::core::ConvertConfig;
use crate::sink::{XLSX_CONTENT_TYPE, XlsxSink};

pub const CONVERT_ROUTE: &str = "/excel_converter/xml_to_xlsx";
/// File name offered to the client for the converted workbook.
pub const DOWNLOAD_NAME: &str = "tally_data.xlsx";

/// Configuration for the HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
    pub convert: ConvertConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_upload_bytes: 64 * 1024 * 1024,
            convert: ConvertConfig::default(),
        }
    }
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

pub fn build_router(config: &ServerConfig) -> Router {
    Router::new()
        .route(CONVERT_ROUTE, post(xml_to_xlsx))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(Arc::new(config.convert.clone()))
}

/// Bind `config.listen` and serve until the process stops.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!(addr = %config.listen, route = CONVERT_ROUTE, "listening");
    axum::serve(listener, build_router(&config)).await
}

async fn xml_to_xlsx(State(config): State<Arc<ConvertConfig>>, multipart: Multipart) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, "No file provided"),
        Err(response) => return response,
    };
    if !upload.filename.to_lowercase().ends_with(".xml") {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Invalid file type. Please upload an XML file.",
        );
    }

    let filename = upload.filename;
    let result = tokio::task::spawn_blocking(move || {
        let sink = XlsxSink::new(config.sheet_name.clone());
        convert_with(&upload.bytes, &config, &sink)
    })
    .await;

    match result {
        Ok(Ok(bytes)) => {
            tracing::info!(%filename, size = bytes.len(), "converted upload");
            (
                [
                    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename={DOWNLOAD_NAME}"),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Ok(Err(err)) if err.is_input_error() => {
            tracing::warn!(%filename, error = %err, "rejected upload");
            error_response(StatusCode::BAD_REQUEST, "Error parsing XML file.")
        }
        Ok(Err(err)) => {
            tracing::error!(%filename, error = %err, "conversion failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {err}"))
        }
        Err(err) => {
            tracing::error!(%filename, error = %err, "conversion task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {err}"))
        }
    }
}

/// First `file` field with a non-empty file name.
async fn read_upload(mut multipart: Multipart) -> Result<Option<Upload>, Response> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| error_response(StatusCode::BAD_REQUEST, err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        if filename.is_empty() {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|err| error_response(StatusCode::BAD_REQUEST, err.to_string()))?;
        return Ok(Some(Upload {
            filename,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, Json(json!({ "message": message }))).into_response()
}
