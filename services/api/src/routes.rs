use crate::infra::{AppState, EARLIEST_YEAR};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Extension;
use axum::Json;
use chrono::{Datelike, Local};
use laborviz::error::AppError;
use laborviz::market::dashboard::{
    build_page, export_records, DashboardPage, DashboardRequest, DashboardView,
};
use laborviz::market::domain::{Sector, YearRange};
use serde::Deserialize;
use serde_json::json;

const DASHBOARD_HTML: &str = include_str!("../assets/dashboard.html");

pub(crate) fn dashboard_router() -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(index))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/dashboard", axum::routing::get(dashboard_endpoint))
        .route("/api/v1/refresh", axum::routing::post(refresh_endpoint))
        .route("/api/v1/export", axum::routing::get(export_endpoint))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    pub(crate) view: Option<String>,
    pub(crate) from: Option<i32>,
    pub(crate) to: Option<i32>,
    /// Comma-separated sector slugs; empty string selects no sector.
    pub(crate) sectors: Option<String>,
}

pub(crate) fn dashboard_request(query: &DashboardQuery) -> Result<DashboardRequest, AppError> {
    let view = match query.view.as_deref() {
        None => DashboardView::Overview,
        Some(raw) => DashboardView::from_slug(raw)
            .ok_or_else(|| AppError::BadRequest(format!("unknown view '{raw}'")))?,
    };

    let years = requested_years(query)?;

    let sectors = match query.sectors.as_deref() {
        None => Sector::ordered().to_vec(),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .map(|slug| {
                Sector::from_slug(slug)
                    .ok_or_else(|| AppError::BadRequest(format!("unknown sector '{slug}'")))
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(DashboardRequest {
        view,
        years,
        sectors,
    })
}

fn requested_years(query: &DashboardQuery) -> Result<YearRange, AppError> {
    let from = query.from.unwrap_or(EARLIEST_YEAR);
    let to = query.to.unwrap_or_else(|| Local::now().year());
    YearRange::new(from, to).map_err(|err| AppError::BadRequest(err.to_string()))
}

async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardPage>, AppError> {
    let request = dashboard_request(&query)?;
    let dataset = state.dashboard.dataset().await?;
    let page = build_page(&dataset, &request)?;
    Ok(Json(page))
}

pub(crate) async fn refresh_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let dataset = state.dashboard.refresh().await?;
    Ok(Json(json!({
        "status": "refreshed",
        "employment_series": dataset.employment.len(),
        "mortgage_observations": dataset.mortgage.len(),
    })))
}

pub(crate) async fn export_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let years = requested_years(&query)?;
    let dataset = state.dashboard.dataset().await?;
    let records = export_records(&dataset, years)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in &records {
        writer
            .serialize(record)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
    }
    let body = writer
        .into_inner()
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"labor_market_filtered.csv\"",
            ),
        ],
        body,
    ))
}
