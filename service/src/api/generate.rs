use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

/// Renders the configured document and returns the PDF.
pub async fn generate_document(State(state): State<AppState>) -> Result<impl IntoResponse> {
    // Waits when the limit is reached; only fails once the semaphore is closed.
    let _permit = state
        .generation_semaphore
        .acquire()
        .await
        .map_err(|_| ServiceError::ShuttingDown)?;

    let output = state.pipeline.generate_with_report(&state.document).await?;
    let report = &output.report;

    tracing::info!(
        pages = ?report.final_pages,
        exact = report.anchors_exact,
        estimated = report.anchors_estimated,
        unresolved = report.unresolved.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Generated {} ({} bytes)",
        state.filename,
        output.pdf.len()
    );
    if report.is_degraded() {
        tracing::warn!("Degraded stages: {:?}", report.degraded);
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", state.filename),
            ),
        ],
        output.pdf,
    ))
}
