//! HTTP surface: the upload page and the conversion endpoints.
//!
//! Each request runs its own pipeline over its own bytes; nothing is shared
//! between requests except the read-only [`SpecPivotOptions`].

use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, post, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;
use leadpivot_core::{
    EnumPipelineErrorKind, PipelineError, PipelineOutcome, SpecPivotOptions, run_pipeline,
};
use serde::Serialize;
use tracing::{info, warn};

const C_INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Debug, Serialize)]
pub struct PreviewBody {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Serialize)]
pub struct PivotBody {
    pub index_name: String,
    pub index: Vec<String>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<u64>>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactBody {
    pub file_name: String,
    pub mime_type: String,
    pub content_base64: String,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub status: &'static str,
    pub message: String,
    pub rows_loaded: u64,
    pub records_expanded: u64,
    pub preview: PreviewBody,
    pub pivot: PivotBody,
    pub artifact: ArtifactBody,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub status: &'static str,
    pub kind: &'static str,
    pub message: String,
    pub hint: &'static str,
    pub missing_columns: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

impl ConvertResponse {
    fn from_outcome(outcome: PipelineOutcome, index_name: &str) -> Self {
        let PipelineOutcome {
            preview,
            table,
            artifact,
            report,
        } = outcome;

        Self {
            status: "success",
            message: format!("Učitano {} redova podataka", report.cnt_rows_loaded),
            rows_loaded: report.cnt_rows_loaded,
            records_expanded: report.cnt_records_expanded,
            preview: PreviewBody {
                columns: preview.columns,
                rows: preview.rows,
            },
            pivot: PivotBody {
                index_name: index_name.to_string(),
                index: table.agents().to_vec(),
                columns: table.statuses().to_vec(),
                values: table.dense_grid(),
            },
            artifact: ArtifactBody {
                file_name: artifact.file_name,
                mime_type: artifact.mime_type.to_string(),
                content_base64: STANDARD.encode(&artifact.bytes),
            },
            warnings: report.warnings,
        }
    }
}

impl FailureResponse {
    fn from_error(err: &PipelineError) -> Self {
        let message = match err {
            PipelineError::Schema { missing } => {
                format!("Nedostaju potrebni stupci: {}", missing.join(", "))
            }
            _ => format!("Došlo je do greške: {err}"),
        };

        Self {
            status: "failed",
            kind: err.kind().as_str(),
            message,
            hint: err.hint(),
            missing_columns: err.missing_columns().to_vec(),
        }
    }
}

fn derive_failure_response(err: &PipelineError) -> HttpResponse {
    warn!(kind = err.kind().as_str(), error = %err, "pipeline failed");
    let body = FailureResponse::from_error(err);
    match err.kind() {
        EnumPipelineErrorKind::Schema | EnumPipelineErrorKind::Parse => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        EnumPipelineErrorKind::Unexpected => HttpResponse::InternalServerError().json(body),
    }
}

async fn run_pipeline_blocking(
    body: web::Bytes,
    options: web::Data<SpecPivotOptions>,
) -> Result<PipelineOutcome, PipelineError> {
    info!(bytes = body.len(), "received upload");
    let captured_at = Local::now().naive_local();
    web::block(move || run_pipeline(&body, &captured_at, &options))
        .await
        .map_err(|err| PipelineError::Unexpected(format!("Worker failed: {err}")))?
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(C_INDEX_HTML)
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run the pipeline and return previews plus the base64 workbook as JSON.
#[post("/api/convert")]
async fn convert(body: web::Bytes, options: web::Data<SpecPivotOptions>) -> HttpResponse {
    let index_name = options.col_agent.clone();
    match run_pipeline_blocking(body, options).await {
        Ok(outcome) => HttpResponse::Ok().json(ConvertResponse::from_outcome(outcome, &index_name)),
        Err(err) => derive_failure_response(&err),
    }
}

/// Run the pipeline and return the workbook itself as an attachment.
#[post("/api/export")]
async fn export(body: web::Bytes, options: web::Data<SpecPivotOptions>) -> HttpResponse {
    match run_pipeline_blocking(body, options).await {
        Ok(outcome) => {
            let artifact = outcome.artifact;
            HttpResponse::Ok()
                .content_type(artifact.mime_type)
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.file_name),
                ))
                .body(artifact.bytes)
        }
        Err(err) => derive_failure_response(&err),
    }
}

/// Register every route on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(health)
        .service(convert)
        .service(export);
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::Value;

    use super::*;

    const C_SCENARIO_CSV: &[u8] =
        b"agent_name,Lead_status\nAna,New\nAna,New; Closed\nIvo,Closed\n";

    macro_rules! init_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(SpecPivotOptions::default()))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn index_serves_upload_page() {
        let app = init_app!();
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let c_html = std::str::from_utf8(&body).expect("utf8");
        assert!(c_html.contains("agent_name"));
        assert!(c_html.contains("accept=\".csv\""));
    }

    #[actix_web::test]
    async fn convert_returns_preview_pivot_and_artifact() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/api/convert")
            .set_payload(C_SCENARIO_CSV)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "success");
        assert_eq!(body["rows_loaded"], 3);
        assert_eq!(body["records_expanded"], 4);
        assert_eq!(body["message"], "Učitano 3 redova podataka");
        assert_eq!(body["pivot"]["index"], serde_json::json!(["Ana", "Ivo"]));
        assert_eq!(body["pivot"]["columns"], serde_json::json!(["Closed", "New"]));
        assert_eq!(body["pivot"]["values"], serde_json::json!([[1, 2], [1, 0]]));
        assert_eq!(body["preview"]["rows"].as_array().map(Vec::len), Some(3));

        let c_name = body["artifact"]["file_name"].as_str().expect("file name");
        assert!(c_name.starts_with("statistika_po_agentima_"));
        assert!(c_name.ends_with(".xlsx"));
        assert_eq!(
            body["artifact"]["mime_type"],
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );

        let v_bytes = STANDARD
            .decode(body["artifact"]["content_base64"].as_str().expect("base64"))
            .expect("decode");
        assert!(v_bytes.starts_with(b"PK"));
    }

    #[actix_web::test]
    async fn convert_reports_missing_column_with_hint() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/api/convert")
            .set_payload(&b"agent_name,state\nAna,New\n"[..])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "failed");
        assert_eq!(body["kind"], "schema");
        assert_eq!(body["missing_columns"], serde_json::json!(["Lead_status"]));
        assert_eq!(body["message"], "Nedostaju potrebni stupci: Lead_status");
        assert!(body["hint"].as_str().is_some_and(|hint| !hint.is_empty()));
    }

    #[actix_web::test]
    async fn convert_reports_parse_error_for_empty_upload() {
        let app = init_app!();
        let req = test::TestRequest::post().uri("/api/convert").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "parse");
    }

    #[actix_web::test]
    async fn convert_reports_empty_agent_as_server_error() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/api/convert")
            .set_payload(&b"agent_name,Lead_status\n,New\nAna,Closed\n"[..])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "unexpected");
        assert!(
            body["message"]
                .as_str()
                .is_some_and(|msg| msg.starts_with("Došlo je do greške: "))
        );
    }

    #[actix_web::test]
    async fn export_returns_attachment() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/api/export")
            .set_payload(C_SCENARIO_CSV)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let headers = resp.headers();
        assert_eq!(
            headers
                .get(header::CONTENT_TYPE)
                .and_then(|val| val.to_str().ok()),
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
        );
        let c_disposition = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|val| val.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(c_disposition.starts_with("attachment; filename=\"statistika_po_agentima_"));

        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"PK"));
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = init_app!();
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }
}
