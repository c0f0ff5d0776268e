//! PDF rendering for the report download buttons.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use leptos::ServerFnError;

use agro_client::report::Report;

use crate::model::ReportFile;

/// Render `report` and wrap it as a browser download.
pub fn to_download(report: &Report) -> Result<ReportFile, ServerFnError> {
    let pdf = report.to_pdf().map_err(|e| {
        tracing::error!("Report rendering failed: {e}");
        ServerFnError::new(e.to_string())
    })?;
    tracing::info!("Rendered {} ({} bytes)", report.file_name(), pdf.len());
    Ok(ReportFile {
        file_name: report.file_name(),
        data_url: format!("data:application/pdf;base64,{}", STANDARD.encode(&pdf)),
    })
}
