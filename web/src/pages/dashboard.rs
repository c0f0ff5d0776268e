//! Dashboard – greeting plus entry points to both analyses.

use leptos::*;
use leptos_router::*;

use crate::session::use_session;

struct Guide {
    feature: &'static str,
    href: &'static str,
    icon: &'static str,
    summary: &'static str,
    steps: [&'static str; 4],
}

const GUIDES: [Guide; 2] = [
    Guide {
        feature: "Crop Recommendation",
        href: "/app/crop",
        icon: "🌱",
        summary: "Get AI-powered crop suggestions based on soil conditions",
        steps: [
            "Navigate to the Crop Recommendation page",
            "Enter your soil data (N, P, K levels)",
            "Add environmental data (temperature, humidity, pH, rainfall)",
            "Click \"Get Recommendations\" to receive AI-powered crop suggestions",
        ],
    },
    Guide {
        feature: "Disease Detection",
        href: "/app/disease",
        icon: "🔬",
        summary: "Identify plant diseases from leaf images instantly",
        steps: [
            "Go to the Disease Detection page",
            "Upload a clear photo of a plant leaf",
            "Ensure the image is well-lit and shows the leaf clearly",
            "Click \"Analyze Plant\" to get instant disease detection results",
        ],
    },
];

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    let name = move || {
        session
            .user()
            .map(|u| u.display_name())
            .unwrap_or_else(|| "User".into())
    };

    view! {
        <div class="dashboard-page">
            <section class="welcome">
                <h1>"Welcome back, " {name} "!"</h1>
                <p>"What would you like to analyse today?"</p>
            </section>

            <div class="feature-grid">
                {GUIDES
                    .iter()
                    .map(|g| view! {
                        <A href=g.href class="feature-card feature-link">
                            <span class="feature-icon">{g.icon}</span>
                            <h3>{g.feature}</h3>
                            <p>{g.summary}</p>
                        </A>
                    })
                    .collect_view()}
            </div>

            <section class="how-to">
                <h2>"How to Use AgriScience"</h2>
                <div class="guide-grid">
                    {GUIDES
                        .iter()
                        .map(|g| view! {
                            <div class="guide">
                                <h3>{g.icon} " " {g.feature}</h3>
                                <ol>
                                    {g.steps.iter().map(|s| view! { <li>{*s}</li> }).collect_view()}
                                </ol>
                            </div>
                        })
                        .collect_view()}
                </div>
            </section>
        </div>
    }
}
