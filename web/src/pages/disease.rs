//! Plant disease detection page – leaf photo upload, analysis, PDF export.

use leptos::*;

use agro_common::analysis::Analysis;
use agro_common::disease::{is_image_mime, DiseaseResult, HealthStatus};

use crate::components::loading::LoadingSpinner;
use crate::components::notice::{ErrorNotice, PlaceholderNotice};
use crate::model::{DiseaseOutcome, InputTicket, Panel, ReportFile, SelectedImage};

// ─── Server functions ────────────────────────────────────────────────────────

#[server(DetectDisease, "/api")]
pub async fn detect_disease(
    file_name: String,
    data_url: String,
) -> Result<DiseaseOutcome, ServerFnError> {
    use agro_common::disease::DiseaseImage;
    use crate::server::{app_state, session::require_user};

    let state = app_state()?;
    let user = require_user(&state).await?;
    let image = DiseaseImage::from_data_url(&file_name, &data_url)
        .ok_or_else(|| ServerFnError::new("Upload is not an image"))?;
    tracing::debug!(
        "User {} submitted {} ({} bytes)",
        user.user_id,
        image.file_name,
        image.bytes.len()
    );
    Ok(state.analyzer.disease(&image).await)
}

#[server(ExportDiseaseReport, "/api")]
pub async fn export_disease_report(
    analysis: Analysis<DiseaseResult>,
    file_name: String,
    data_url: String,
) -> Result<ReportFile, ServerFnError> {
    use agro_client::report::Report;
    use agro_common::disease::DiseaseImage;
    use crate::server::{app_state, report::to_download, session::require_user};

    let state = app_state()?;
    require_user(&state).await?;
    let image = DiseaseImage::from_data_url(&file_name, &data_url);
    to_download(&Report::disease(&analysis, image.as_ref(), chrono::Local::now()))
}

// ─── Upload helpers ──────────────────────────────────────────────────────────

/// Read a browser file, skipping anything that is not an image.
async fn read_upload(file: web_sys::File) -> Option<SelectedImage> {
    let mime = file.type_();
    if !is_image_mime(&mime) {
        logging::warn!("Ignoring {} ({mime})", file.name());
        return None;
    }
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .ok()?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    SelectedImage::from_upload(&file.name(), &mime, bytes)
}

// ─── Page component ──────────────────────────────────────────────────────────

#[component]
pub fn DiseasePage() -> impl IntoView {
    let (image, set_image) = create_signal::<Option<SelectedImage>>(None);
    let panel = create_rw_signal(Panel::<DiseaseResult>::Empty);
    let (report, set_report) = create_signal::<Option<ReportFile>>(None);
    let (exporting, set_exporting) = create_signal(false);
    let (dragging, set_dragging) = create_signal(false);
    // Bumped on every image change; responses for an older image are dropped.
    let ticket = create_rw_signal(InputTicket::default());

    let select = move |file: web_sys::File| {
        spawn_local(async move {
            if let Some(selected) = read_upload(file).await {
                ticket.update(InputTicket::bump);
                set_image.set(Some(selected));
                panel.set(Panel::Empty);
                set_report.set(None);
            }
        });
    };

    let on_change = move |ev: ev::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|list| list.get(0)) {
            select(file);
        }
    };

    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        set_dragging.set(false);
        if let Some(file) = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|list| list.get(0))
        {
            select(file);
        }
    };

    let on_analyze = move |_| {
        let Some(selected) = image.get_untracked() else {
            return;
        };
        if panel.with_untracked(Panel::is_loading) {
            return;
        }
        let issued = ticket.get_untracked();
        panel.set(Panel::Loading);
        set_report.set(None);
        spawn_local(async move {
            let next = match detect_disease(selected.file_name, selected.data_url).await {
                Ok(outcome) => Panel::from_outcome(outcome),
                Err(e) => Panel::Failed(format!("Request failed: {e}")),
            };
            let current = ticket.get_untracked();
            panel.update(|p| {
                if !p.settle(issued, current, next) {
                    logging::log!("Dropped analysis for a replaced image");
                }
            });
        });
    };

    let on_export = move |_| {
        let (Some(selected), Some(analysis)) = (
            image.get_untracked(),
            panel.with_untracked(|p| p.ready().cloned()),
        ) else {
            return;
        };
        set_exporting.set(true);
        spawn_local(async move {
            match export_disease_report(analysis, selected.file_name, selected.data_url).await {
                Ok(file) => set_report.set(Some(file)),
                Err(e) => logging::error!("Report export failed: {e}"),
            }
            set_exporting.set(false);
        });
    };

    let on_clear = move |_| {
        ticket.update(InputTicket::bump);
        set_image.set(None);
        panel.set(Panel::Empty);
        set_report.set(None);
    };

    view! {
        <div class="disease-page">
            <h1>"Plant Disease Detection"</h1>
            <p class="subtitle">"Upload a clear photo of a single leaf to check it for disease."</p>

            <div class="analysis-layout">
                <section class="card upload">
                    <div
                        class="drop-zone"
                        class:dragging=move || dragging.get()
                        on:dragover=move |ev: ev::DragEvent| {
                            ev.prevent_default();
                            set_dragging.set(true);
                        }
                        on:dragleave=move |_| set_dragging.set(false)
                        on:drop=on_drop
                    >
                        {move || match image.get() {
                            Some(selected) => view! {
                                <img class="preview" src=selected.data_url alt=selected.file_name.clone()/>
                                <p class="file-name">{selected.file_name}</p>
                            }.into_view(),
                            None => view! {
                                <span class="drop-icon">"📷"</span>
                                <p>"Drag and drop a leaf image here, or"</p>
                            }.into_view(),
                        }}
                        <label class="btn btn-outline">
                            "Browse files"
                            <input type="file" accept="image/*" hidden on:change=on_change/>
                        </label>
                    </div>

                    <div class="upload-actions">
                        <button
                            class="btn btn-primary"
                            on:click=on_analyze
                            disabled=move || image.with(Option::is_none) || panel.with(Panel::is_loading)
                        >
                            {move || if panel.with(Panel::is_loading) { "Analyzing…" } else { "Analyze Plant" }}
                        </button>
                        <Show when=move || image.with(Option::is_some)>
                            <button class="btn btn-outline" on:click=on_clear>"Clear"</button>
                        </Show>
                    </div>
                </section>

                <section class="card results">
                    <h2>"Analysis Result"</h2>
                    {move || match panel.get() {
                        Panel::Empty => view! {
                            <p class="empty">"Results will appear here after analysis."</p>
                        }.into_view(),
                        Panel::Loading => view! {
                            <LoadingSpinner message="Examining the leaf…"/>
                        }.into_view(),
                        Panel::Failed(msg) => view! { <ErrorNotice message=msg/> }.into_view(),
                        Panel::Ready(analysis) => {
                            let reason = analysis.placeholder_reason().map(str::to_string);
                            let result = analysis.into_value();
                            view! {
                                {reason.map(|r| view! { <PlaceholderNotice reason=r/> })}
                                <DiseaseVerdict result=result/>
                                <div class="report-actions">
                                    <button
                                        class="btn btn-outline"
                                        on:click=on_export
                                        disabled=move || exporting.get()
                                    >
                                        {move || if exporting.get() { "Preparing…" } else { "Download Report" }}
                                    </button>
                                    {move || report.get().map(|file| view! {
                                        <a class="btn btn-success" href=file.data_url download=file.file_name>
                                            "Save PDF"
                                        </a>
                                    })}
                                </div>
                            }.into_view()
                        }
                    }}
                </section>
            </div>
        </div>
    }
}

#[component]
fn DiseaseVerdict(result: DiseaseResult) -> impl IntoView {
    let healthy = result.status == HealthStatus::Healthy;
    view! {
        <div class="verdict" class:healthy=healthy class:diseased=!healthy>
            <span class="verdict-icon">{if healthy { "✅" } else { "⚠️" }}</span>
            <h3>{result.status.headline()}</h3>
            <p class="verdict-confidence">"Confidence: " {format!("{}%", result.confidence)}</p>
            {result.disease.map(|label| view! { <p class="verdict-label">{label}</p> })}
            {result.raw_label.filter(|_| !healthy).map(|raw| view! {
                <p class="verdict-raw">"Model output: " <code>{raw}</code></p>
            })}
        </div>
    }
}
