use crate::chart::{self, ChartConfig, ChartKind};
use crate::errors::ClientError;
use crate::presenter;
use crate::resources::ResourceContext;
use crate::state::AppState;
use crate::ui;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Uri},
    response::Html,
    Json,
};
use tracing::{error, info, warn};

/// Page load: derive the resources from the url, fetch every statistic and
/// render them into the page skeleton.
pub async fn statistics_page(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Html<String>, ClientError> {
    let resources = ResourceContext::from_url(uri.path());
    let api = state.api_for(resources, session_cookie(&headers));

    let mut doc = ui::statistics_document();
    presenter::show_project_stats(&mut doc, &api).await.inspect_err(log_failure)?;
    presenter::show_user_stats(&mut doc, &api).await.inspect_err(log_failure)?;
    // Projects without teams answer 404 here; the stats still render.
    if let Err(err) = chart::show_chart(&mut doc, &api, ChartKind::TasksPerTeam).await {
        warn!(path = %uri.path(), "initial chart skipped: {err}");
    }

    info!(path = %uri.path(), "statistics page rendered");
    Ok(Html(ui::render_statistics_page(&doc, uri.path())))
}

/// What a chart button click fetches.
pub async fn chart_config(
    State(state): State<AppState>,
    Path((_, _, kind)): Path<(String, String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<ChartConfig>, ClientError> {
    let kind = ChartKind::from_slug(&kind)
        .ok_or_else(|| ClientError::not_found(format!("unknown chart '{kind}'")))?;
    let api = state.api_for(ResourceContext::from_url(uri.path()), session_cookie(&headers));

    let data = kind.fetch(&api).await.inspect_err(log_failure)?;
    Ok(Json(chart::build_chart(kind.label(), &data)))
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn log_failure(err: &ClientError) {
    error!("backend request failed: {err}");
}
