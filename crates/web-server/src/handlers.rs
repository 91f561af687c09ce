use crate::{AppState, error::AppError, query::FilterQuery, render};
use axum::{
    Json,
    extract::{Path, State},
    response::Html,
};
use axum_extra::extract::Query;
use configuration::Navigation;
use pages::{FilterSelection, Page, PageView};
use std::sync::Arc;

fn find_page<'a>(state: &'a AppState, slug: &str) -> Result<&'a dyn Page, AppError> {
    state
        .pages
        .by_path(slug)
        .ok_or_else(|| AppError::NotFound(format!("No page at '/{slug}'")))
}

fn render_page(page: &dyn Page, query: &FilterQuery) -> Result<PageView, AppError> {
    let selection = query.selection(&page.panel())?;
    tracing::debug!(page = %page.id(), ?selection, "Rendering page.");
    Ok(page.render(&selection)?)
}

/// # GET /
pub async fn landing(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let home = state
        .pages
        .home()
        .ok_or_else(|| AppError::NotFound("No landing page".to_string()))?;
    let view = home.render(&FilterSelection::new())?;
    Ok(Html(render::home(state.pages.navigation(), &view)?))
}

/// # GET /:slug
/// The page as HTML, filtered by the form's query string.
pub async fn page_html(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Html<String>, AppError> {
    let page = find_page(&state, &slug)?;
    let view = render_page(page, &query)?;
    Ok(Html(render::page(
        state.pages.navigation(),
        &slug,
        &page.panel(),
        &view,
    )?))
}

/// # GET /api/pages/:slug
/// The same view as JSON. Accepts the same query parameters as the HTML form.
pub async fn page_json(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<PageView>, AppError> {
    let page = find_page(&state, &slug)?;
    Ok(Json(render_page(page, &query)?))
}

/// # GET /api/navigation
pub async fn navigation(State(state): State<Arc<AppState>>) -> Json<Navigation> {
    Json(state.pages.navigation().clone())
}
