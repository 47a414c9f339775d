use crate::error::Result;
use crate::model::{CreateLinkRequest, LinkResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use stubby_core::{CreateParams, LookupError, ShortCode, DEFAULT_VALIDITY_MINUTES};

/// A path segment that is not a well-formed code cannot name a link.
fn parse_code(raw: String) -> Result<ShortCode> {
    ShortCode::new(raw.as_str()).map_err(|_| LookupError::NotFound(raw).into())
}

pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>)> {
    let params = CreateParams {
        original_url: request.url,
        // An empty custom code field means "generate one".
        custom_code: request.custom_code.filter(|code| !code.is_empty()),
        validity_minutes: request
            .validity_minutes
            .unwrap_or(i64::from(DEFAULT_VALIDITY_MINUTES)),
    };

    let record = state.registry().create(params).await?;
    let response = LinkResponse::new(record, state.base_url(), false);
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_links_handler(State(state): State<AppState>) -> Result<Json<Vec<LinkResponse>>> {
    let registry = state.registry();
    let links = registry
        .list()
        .await?
        .into_iter()
        .map(|record| {
            let expired = registry.is_expired(&record);
            LinkResponse::new(record, state.base_url(), expired)
        })
        .collect();
    Ok(Json(links))
}

pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    let code = parse_code(code)?;
    state.registry().delete(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect> {
    let code = parse_code(code)?;
    let resolution = state.registry().resolve(&code).await?;
    Ok(Redirect::temporary(&resolution.original_url))
}
