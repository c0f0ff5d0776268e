//! Server entry-point – Axum + Leptos SSR.

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use axum::{
        extract::{DefaultBodyLimit, State},
        response::{IntoResponse, Response},
        Router,
    };
    use leptos::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use std::path::PathBuf;
    use std::time::Duration;
    use tower_http::services::ServeDir;

    use agro_client::inference::Analyzer;
    use agro_client::sessions::SessionStore;
    use agro_common::config::{self, Config};
    use agro_web::app::{App, AppState};

    // ── Tracing ──────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agro_web=info,agro_client=info,tower_http=info".into()),
        )
        .init();

    // ── Configuration ────────────────────────────────────────────────────
    let config_path = std::env::var("AGRO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(Config::default_path()));
    let config = config::load(&config_path).context("Config load failed")?;
    tracing::info!(
        "Inference API at {} (demo_mode={}, auth={:?})",
        config.api_base_url,
        config.demo_mode,
        config.auth_mode
    );

    let conf = get_configuration(None).await?;
    let mut leptos_options = conf.leptos_options.clone();
    if let Some(listen) = &config.listen_addr {
        leptos_options.site_addr = listen
            .parse()
            .with_context(|| format!("Invalid LISTEN_ADDR {listen}"))?;
    }
    let addr = leptos_options.site_addr;
    let site_root = leptos_options.site_root.clone();

    let state = AppState {
        analyzer: Analyzer::from_config(&config)?,
        auth: agro_client::auth::from_config(&config)?,
        sessions: SessionStore::new(),
        config,
        leptos_options: leptos_options.clone(),
    };

    // Expired sessions are dropped lazily on lookup; sweep the table hourly too.
    {
        let sessions = state.sessions.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(3600));
            loop {
                tick.tick().await;
                let dropped = sessions.cleanup_expired().await;
                if dropped > 0 {
                    tracing::info!("Dropped {dropped} expired sessions");
                }
            }
        });
    }

    const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

    /// Fallback: try to serve a static file, otherwise return 404.
    async fn fallback_handler(
        State(options): State<LeptosOptions>,
        req: axum::http::Request<axum::body::Body>,
    ) -> Response {
        let root = options.site_root.clone();
        let (parts, _body) = req.into_parts();
        let path = format!("{}{}", root, parts.uri.path());

        if let Ok(meta) = tokio::fs::metadata(&path).await {
            if meta.is_file() {
                if let Ok(bytes) = tokio::fs::read(&path).await {
                    return (
                        axum::http::StatusCode::OK,
                        [(axum::http::header::CONTENT_TYPE, mime_for(&path))],
                        bytes,
                    )
                        .into_response();
                }
            }
        }

        (axum::http::StatusCode::NOT_FOUND, "Not Found").into_response()
    }

    fn mime_for(path: &str) -> &'static str {
        match path.rsplit('.').next().unwrap_or("") {
            "html" => "text/html; charset=utf-8",
            "css" => "text/css",
            "js" => "application/javascript",
            "wasm" => "application/wasm",
            "svg" => "image/svg+xml",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "ico" => "image/x-icon",
            "json" => "application/json",
            _ => "application/octet-stream",
        }
    }

    // ── Routes ───────────────────────────────────────────────────────────
    let routes = generate_route_list(App);

    let app = Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let state = state.clone();
                move || {
                    provide_context(state.clone());
                }
            },
            App,
        )
        // Serve static assets (WASM bundle, CSS, images, etc.)
        .nest_service("/pkg", ServeDir::new(format!("{site_root}/pkg")))
        .fallback(fallback_handler)
        // Leaf photos arrive base64-encoded inside server-function bodies.
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(leptos_options);

    tracing::info!("AgriScience Web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // This binary is only built with the `ssr` feature.
    // The WASM entry point is `lib::hydrate()`.
}
