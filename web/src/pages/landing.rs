//! Landing page – public marketing copy with links to sign in.

use leptos::*;
use leptos_router::*;

const FEATURES: [(&str, &str, &str); 4] = [
    (
        "🌱",
        "Smart Crop Recommendations",
        "Get AI-powered crop suggestions based on your soil conditions, climate data, \
         and local farming practices for optimal yields.",
    ),
    (
        "🔬",
        "Disease Detection",
        "Identify plant diseases from a single leaf photo using computer vision.",
    ),
    (
        "📖",
        "Open Source",
        "Built with transparency in mind. Inspect, modify and contribute to the codebase.",
    ),
    (
        "⚡",
        "Real-time Analysis",
        "Get results in seconds and download them as a PDF report.",
    ),
];

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="landing-page">
            <header class="landing-header">
                <span class="nav-logo">"🌾 AgriScience"</span>
                <div class="landing-actions">
                    <A href="/login" class="btn btn-outline">"Login"</A>
                    <A href="/signup" class="btn btn-primary">"Get Started"</A>
                </div>
            </header>

            <section class="hero">
                <h1>"Revolutionize Your " <span class="accent">"Farming with AI"</span></h1>
                <p class="hero-text">
                    "Detect plant diseases instantly, get personalized crop recommendations "
                    "and maximize your yields with data-driven insights."
                </p>
                <A href="/signup" class="btn btn-primary btn-large">"Start for free"</A>
            </section>

            <section class="features">
                <h2>"Everything you need for smarter farming"</h2>
                <div class="feature-grid">
                    {FEATURES
                        .iter()
                        .map(|(icon, title, description)| view! {
                            <div class="feature-card">
                                <span class="feature-icon">{*icon}</span>
                                <h3>{*title}</h3>
                                <p>{*description}</p>
                            </div>
                        })
                        .collect_view()}
                </div>
            </section>

            <footer class="landing-footer">
                <span>"🌾 AgriScience"</span>
                <p>"Helping farmers make better decisions."</p>
            </footer>
        </div>
    }
}
