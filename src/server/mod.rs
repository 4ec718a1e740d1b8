//! On-demand page server
//!
//! Serves the generated site. A request for a slug with no generated page
//! answers with the transient loading page while generation runs in the
//! background; a stale page is served as-is and refreshed in the background.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;

use crate::api::{ApiError, ContentClient};
use crate::cache::{unix_now, CacheDb};
use crate::content::is_valid_slug;
use crate::generator::Generator;
use crate::Caravel;

/// Server state shared across requests
struct ServerState {
    caravel: Caravel,
    client: ContentClient,
    generator: Generator,
    cache: Mutex<CacheDb>,
    /// Slugs with a generation currently in flight
    in_flight: Mutex<HashSet<String>>,
    /// Slugs the content API answered 404 for, with the time of the answer
    missing: Mutex<HashMap<String, u64>>,
}

/// Start the server
pub async fn start(caravel: &Caravel, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState {
        caravel: caravel.clone(),
        client: caravel.client(),
        generator: Generator::new(caravel)?,
        cache: Mutex::new(CacheDb::load(&caravel.base_dir)),
        in_flight: Mutex::new(HashSet::new()),
        missing: Mutex::new(HashMap::new()),
    });

    let serve_dir = ServeDir::new(&caravel.public_dir).append_index_html_on_directories(true);

    let app = Router::new()
        .route("/posts/:slug", get(post_handler))
        .route("/posts/:slug/", get(post_handler))
        .fallback_service(serve_dir)
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve one post page, generating it on demand when necessary
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    if !is_valid_slug(&slug) {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    // A slug the API already answered 404 for stays not-found until the
    // revalidation window allows another attempt
    {
        let missing = state.missing.lock().await;
        if let Some(seen_at) = missing.get(&slug) {
            if unix_now().saturating_sub(*seen_at) < state.caravel.config.revalidate_secs {
                return (StatusCode::NOT_FOUND, "Not found").into_response();
            }
        }
    }

    let page_path = state
        .caravel
        .public_dir
        .join("posts")
        .join(&slug)
        .join("index.html");

    if page_path.is_file() {
        let stale = {
            let cache = state.cache.lock().await;
            cache.is_stale(&slug, unix_now(), state.caravel.config.revalidate_secs)
        };
        if stale {
            tracing::debug!("Page for '{}' is stale, regenerating in background", slug);
            spawn_generation(&state, &slug);
        }

        match tokio::fs::read_to_string(&page_path).await {
            Ok(content) => Html(content).into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    } else {
        // Unknown slug: answer with the loading page while generation runs;
        // the page's refresh picks up the generated file once it lands
        spawn_generation(&state, &slug);
        match state.generator.render_loading_page() {
            Ok(html) => Html(html).into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Spawn a background generation for `slug`, at most one in flight per slug
fn spawn_generation(state: &Arc<ServerState>, slug: &str) {
    let state = Arc::clone(state);
    let slug = slug.to_string();

    tokio::spawn(async move {
        {
            let mut in_flight = state.in_flight.lock().await;
            if !in_flight.insert(slug.clone()) {
                return;
            }
        }

        match state.generator.generate_post(&state.client, &slug).await {
            Ok(_) => {
                let mut cache = state.cache.lock().await;
                cache.record(&slug, &format!("posts/{}/index.html", slug), unix_now());
                if let Err(e) = cache.save(&state.caravel.base_dir) {
                    tracing::warn!("Failed to save cache: {}", e);
                }
                state.missing.lock().await.remove(&slug);
                tracing::info!("Generated page for slug '{}'", slug);
            }
            Err(err) => match err.downcast_ref::<ApiError>() {
                Some(ApiError::NotFound { .. }) => {
                    state.missing.lock().await.insert(slug.clone(), unix_now());
                    tracing::warn!("No document for slug '{}'", slug);
                }
                _ => {
                    tracing::error!("Generation failed for '{}': {:#}", slug, err);
                }
            },
        }

        state.in_flight.lock().await.remove(&slug);
    });
}
