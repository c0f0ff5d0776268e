//! Crop recommendation page – soil/climate form, ranked results, PDF export.

use leptos::*;

use agro_common::analysis::Analysis;
use agro_common::crop::{CropForm, CropRecommendation, CROP_FIELDS};

use crate::components::loading::LoadingSpinner;
use crate::components::notice::{ErrorNotice, PlaceholderNotice};
use crate::model::{CropOutcome, Panel, ReportFile};

// ─── Server functions ────────────────────────────────────────────────────────

#[server(RecommendCrops, "/api")]
pub async fn recommend_crops(form: CropForm) -> Result<CropOutcome, ServerFnError> {
    use crate::server::{app_state, session::require_user};

    let state = app_state()?;
    let user = require_user(&state).await?;
    let input = form.parse();
    let out_of_range = input.out_of_range();
    if !out_of_range.is_empty() {
        tracing::debug!("User {} sent out-of-range fields {out_of_range:?}", user.user_id);
    }
    Ok(state.analyzer.crops(&input).await)
}

#[server(ExportCropReport, "/api")]
pub async fn export_crop_report(
    form: CropForm,
    analysis: Analysis<Vec<CropRecommendation>>,
) -> Result<ReportFile, ServerFnError> {
    use agro_client::report::Report;
    use crate::server::{app_state, report::to_download, session::require_user};

    let state = app_state()?;
    require_user(&state).await?;
    to_download(&Report::crop(&form.parse(), &analysis, chrono::Local::now()))
}

// ─── Page component ──────────────────────────────────────────────────────────

#[component]
pub fn CropPage() -> impl IntoView {
    let form = create_rw_signal(CropForm::default());
    let panel = create_rw_signal(Panel::<Vec<CropRecommendation>>::Empty);
    // The form as it was when the current results were computed.
    let (submitted, set_submitted) = create_signal::<Option<CropForm>>(None);
    let (report, set_report) = create_signal::<Option<ReportFile>>(None);
    let (exporting, set_exporting) = create_signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if panel.with_untracked(Panel::is_loading) {
            return;
        }
        let current = form.get_untracked();
        panel.set(Panel::Loading);
        set_report.set(None);
        set_submitted.set(None);

        spawn_local(async move {
            let next = match recommend_crops(current.clone()).await {
                Ok(outcome) => Panel::from_outcome(outcome),
                Err(e) => Panel::Failed(format!("Request failed: {e}")),
            };
            if matches!(next, Panel::Ready(_)) {
                set_submitted.set(Some(current));
            }
            panel.set(next);
        });
    };

    let on_export = move |_| {
        let (Some(form), Some(analysis)) = (
            submitted.get_untracked(),
            panel.with_untracked(|p| p.ready().cloned()),
        ) else {
            return;
        };
        set_exporting.set(true);
        spawn_local(async move {
            match export_crop_report(form, analysis).await {
                Ok(file) => set_report.set(Some(file)),
                Err(e) => logging::error!("Report export failed: {e}"),
            }
            set_exporting.set(false);
        });
    };

    // Blank fields are left to the browser's `required` check.
    let out_of_range = move || {
        form.with(|f| {
            f.parse()
                .out_of_range()
                .into_iter()
                .filter(|field| !f.get(*field).trim().is_empty())
                .map(|field| field.spec().caption())
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="crop-page">
            <h1>"Crop Recommendation"</h1>
            <p class="subtitle">
                "Enter your soil nutrients and local climate to get AI-powered crop suggestions."
            </p>

            <div class="analysis-layout">
                <form class="card crop-form" on:submit=on_submit>
                    <div class="field-grid">
                        {CROP_FIELDS
                            .iter()
                            .map(|spec| {
                                let field = spec.field;
                                view! {
                                    <label class="field">
                                        <span class="field-label">{spec.caption()}</span>
                                        <input
                                            type="number"
                                            name=spec.name
                                            required
                                            min=spec.min.to_string()
                                            max=spec.max.to_string()
                                            step=spec.step.to_string()
                                            placeholder=format!("{} – {}", spec.min, spec.max)
                                            prop:value=move || form.with(|f| f.get(field).to_string())
                                            on:input=move |ev| {
                                                form.update(|f| f.set(field, event_target_value(&ev)))
                                            }
                                        />
                                    </label>
                                }
                            })
                            .collect_view()}
                    </div>

                    {move || {
                        let fields = out_of_range();
                        (!fields.is_empty()).then(|| view! {
                            <p class="field-hint">
                                "Outside the usual range: " {fields.join(", ")}
                            </p>
                        })
                    }}

                    <button
                        type="submit"
                        class="btn btn-primary"
                        disabled=move || panel.with(Panel::is_loading)
                    >
                        {move || if panel.with(Panel::is_loading) {
                            "Analyzing…"
                        } else {
                            "Get Recommendations"
                        }}
                    </button>
                </form>

                <section class="card results">
                    <h2>"Recommended Crops"</h2>
                    {move || match panel.get() {
                        Panel::Empty => view! {
                            <p class="empty">"Fill in the form to see which crops suit your field."</p>
                        }.into_view(),
                        Panel::Loading => view! {
                            <LoadingSpinner message="Analyzing your soil data…"/>
                        }.into_view(),
                        Panel::Failed(msg) => view! { <ErrorNotice message=msg/> }.into_view(),
                        Panel::Ready(analysis) => {
                            let reason = analysis.placeholder_reason().map(str::to_string);
                            let rows = analysis.into_value();
                            view! {
                                {reason.map(|r| view! { <PlaceholderNotice reason=r/> })}
                                <ol class="crop-list">
                                    {rows.into_iter().map(crop_row).collect_view()}
                                </ol>
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

fn crop_row(row: CropRecommendation) -> impl IntoView {
    view! {
        <li class="crop-row">
            <span class="crop-icon">{row.icon}</span>
            <span class="crop-name">{row.name}</span>
            <div class="confidence-bar">
                <div class="confidence-fill" style=format!("width: {}%", row.confidence.min(100))></div>
            </div>
            <span class="crop-confidence">{format!("{}%", row.confidence)}</span>
        </li>
    }
}
