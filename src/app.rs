use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::catalog::{
    clamp_page, episode_count, page_window, paginate, total_pages, Catalog, Collection,
    PageWindow, StaticParams,
};
use crate::config::Config;
use crate::display::{AnimeCard, AnimeDetail, WatchView};
use crate::i18n::Locale;
use crate::models::AnimeRecord;
use crate::snapshot::Snapshot;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub page_size: usize,
}

impl AppState {
    pub fn new(catalog: Catalog, page_size: usize) -> Self {
        Self {
            catalog: Arc::new(catalog),
            page_size,
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let snapshot = Snapshot::load_dir(&config.snapshot_dir).with_context(|| {
        format!(
            "Failed to load snapshot from {}",
            config.snapshot_dir.display()
        )
    })?;
    let catalog = Catalog::new(snapshot);
    info!("Catalog ready with {} unique titles", catalog.unified().len());

    let app = build_router(AppState::new(catalog, config.page_size));

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/latest-anime", get(latest_anime))
        .route("/api/popular-anime", get(popular_anime))
        .route("/api/new-releases-anime", get(new_releases_anime))
        .route("/api/all-anime", get(all_anime))
        .route("/api/home", get(home))
        .route("/api/latest", get(latest_view))
        .route("/api/popular", get(popular_view))
        .route("/api/weekly", get(weekly_view))
        .route("/api/search", get(search_view))
        .route("/api/anime/:id", get(anime_detail))
        .route("/api/watch/:id/:episode", get(watch_view))
        .route("/api/static-params", get(static_params))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn latest_anime(State(state): State<AppState>) -> Response {
    Json(&state.catalog.snapshot().latest).into_response()
}

async fn popular_anime(State(state): State<AppState>) -> Response {
    Json(&state.catalog.snapshot().popular).into_response()
}

async fn new_releases_anime(State(state): State<AppState>) -> Response {
    Json(&state.catalog.snapshot().new_releases).into_response()
}

async fn all_anime(State(state): State<AppState>) -> Response {
    let snapshot = state.catalog.snapshot();
    let generated_at = snapshot.generated_at.unwrap_or_else(Utc::now);
    Json(snapshot.combined(generated_at)).into_response()
}

#[derive(Debug, Default, Deserialize)]
struct ViewQuery {
    page: Option<String>,
    lang: Option<String>,
    q: Option<String>,
}

impl ViewQuery {
    /// Unknown or missing `lang` falls back to the default locale.
    fn locale(&self) -> Locale {
        match self.lang.as_deref() {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                debug!("{}, using default locale", e);
                Locale::default()
            }),
            None => Locale::default(),
        }
    }

    /// Non-numeric pages are treated as page 1; clamping happens later.
    fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Serialize)]
struct HomeSection {
    key: &'static str,
    title: &'static str,
    items: Vec<AnimeCard>,
}

#[derive(Serialize)]
struct HomeView {
    locale: Locale,
    hero: Vec<AnimeCard>,
    sections: Vec<HomeSection>,
}

fn cards<'a>(records: impl IntoIterator<Item = &'a AnimeRecord>, locale: Locale) -> Vec<AnimeCard> {
    records
        .into_iter()
        .map(|r| AnimeCard::new(r, locale))
        .collect()
}

fn section_title(collection: Collection, locale: Locale) -> &'static str {
    let strings = locale.strings();
    match collection {
        Collection::Latest => strings.latest_anime,
        Collection::Popular => strings.popular_anime,
        Collection::NewReleases => strings.weekly_updates,
    }
}

async fn home(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Json<HomeView> {
    let locale = query.locale();
    let catalog = &state.catalog;
    let sections = Collection::ALL
        .iter()
        .map(|&collection| HomeSection {
            key: collection.as_str(),
            title: section_title(collection, locale),
            items: cards(catalog.home_section(collection), locale),
        })
        .collect();
    Json(HomeView {
        locale,
        hero: cards(catalog.home_section(Collection::Popular), locale),
        sections,
    })
}

#[derive(Serialize)]
struct ListingView {
    locale: Locale,
    title: &'static str,
    items: Vec<AnimeCard>,
    pagination: PageWindow,
    page_size: usize,
    total: usize,
}

fn listing_view(
    records: Vec<&AnimeRecord>,
    collection: Collection,
    state: &AppState,
    query: &ViewQuery,
) -> Json<ListingView> {
    let locale = query.locale();
    let total = records.len();
    let current = clamp_page(query.page(), total_pages(total, state.page_size));
    let page = paginate(&records, state.page_size, current);
    Json(ListingView {
        locale,
        title: section_title(collection, locale),
        items: cards(page.items.iter().copied(), locale),
        pagination: page_window(current, page.total_pages),
        page_size: state.page_size,
        total,
    })
}

async fn latest_view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<ListingView> {
    listing_view(state.catalog.latest(), Collection::Latest, &state, &query)
}

async fn popular_view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<ListingView> {
    listing_view(state.catalog.popular(), Collection::Popular, &state, &query)
}

async fn weekly_view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<ListingView> {
    listing_view(state.catalog.weekly(), Collection::NewReleases, &state, &query)
}

#[derive(Serialize)]
struct SearchView {
    locale: Locale,
    title: &'static str,
    query: String,
    results: Vec<AnimeCard>,
    /// Set when a non-empty query matched nothing.
    message: Option<&'static str>,
}

async fn search_view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<SearchView> {
    let locale = query.locale();
    let text = query.q.as_deref().unwrap_or("").trim().to_string();
    let hits = state.catalog.search(&text);
    let message = (!text.is_empty() && hits.is_empty()).then(|| locale.strings().no_results);
    Json(SearchView {
        locale,
        title: locale.strings().search_results,
        query: text,
        results: cards(hits, locale),
        message,
    })
}

#[derive(Serialize)]
struct NotFound {
    error: &'static str,
    message: &'static str,
}

fn not_found(locale: Locale) -> Response {
    let strings = locale.strings();
    (
        StatusCode::NOT_FOUND,
        Json(NotFound {
            error: strings.not_found,
            message: strings.not_found_desc,
        }),
    )
        .into_response()
}

fn lookup<'a>(catalog: &'a Catalog, raw_id: &str) -> Option<&'a AnimeRecord> {
    let id: i32 = raw_id.trim().parse().ok()?;
    catalog.get(id)
}

async fn anime_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Response {
    let locale = query.locale();
    match lookup(&state.catalog, &id) {
        Some(record) => Json(AnimeDetail::new(record, locale)).into_response(),
        None => {
            debug!("No anime with id {}", id);
            not_found(locale)
        }
    }
}

async fn watch_view(
    State(state): State<AppState>,
    Path((id, episode)): Path<(String, String)>,
    Query(query): Query<ViewQuery>,
) -> Response {
    let locale = query.locale();
    let Some(record) = lookup(&state.catalog, &id) else {
        debug!("No anime with id {}", id);
        return not_found(locale);
    };
    let count = episode_count(record);
    match episode.trim().parse::<i32>() {
        Ok(ep) if (1..=count).contains(&ep) => {
            Json(WatchView::new(record, ep, locale)).into_response()
        }
        _ => {
            debug!("Episode {} out of range for anime {}", episode, record.id);
            not_found(locale)
        }
    }
}

async fn static_params(State(state): State<AppState>) -> Json<StaticParams> {
    Json(state.catalog.static_params())
}

/// Resolves once `signal` fires. A listener that could not be installed
/// never resolves, so it cannot trigger a shutdown on its own.
async fn signal_or_pending(signal: impl Future<Output = std::io::Result<()>>, name: &str) {
    if let Err(e) = signal.await {
        warn!("Failed to listen for {}: {}", name, e);
        std::future::pending::<()>().await;
    }
}

async fn shutdown_signal() {
    let ctrl_c = signal_or_pending(tokio::signal::ctrl_c(), "Ctrl+C");

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
