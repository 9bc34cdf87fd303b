use crate::error::{ApiError, ErrorResponse, Resource};
use crate::models::{DeleteResponse, DetailsUpdate, EntryResponse, SubmenuResponse};
use crate::records::{Details, Entry};
use crate::state::AppState;
use crate::{mutations, queries, routes};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /api/v1/menus/{menu_id}/submenus handler - List submenus with their dish counts
///
/// An unknown menu yields an empty list rather than 404.
#[utoipa::path(
    get,
    path = routes::SUBMENUS,
    params(("menu_id" = i64, Path, description = "Menu id")),
    responses(
        (status = 200, description = "Submenus of the menu", body = [SubmenuResponse]),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "submenus"
)]
pub async fn list_submenus(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<(StatusCode, Json<Vec<SubmenuResponse>>), ApiError> {
    let Path(menu_id) = path?;

    let mut conn = state.store.acquire().await?;
    let submenus = queries::list_submenus(&mut conn, menu_id).await?;

    tracing::info!("Listed {} submenus of menu {}", submenus.len(), menu_id);
    Ok((
        StatusCode::OK,
        Json(submenus.into_iter().map(SubmenuResponse::from).collect()),
    ))
}

/// GET /api/v1/menus/{menu_id}/submenus/{submenu_id} handler
#[utoipa::path(
    get,
    path = routes::SUBMENU,
    params(
        ("menu_id" = i64, Path, description = "Menu id"),
        ("submenu_id" = i64, Path, description = "Submenu id")
    ),
    responses(
        (status = 200, description = "Submenu found", body = SubmenuResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Submenu not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "submenus"
)]
pub async fn get_submenu(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<(StatusCode, Json<SubmenuResponse>), ApiError> {
    let Path((menu_id, submenu_id)) = path?;

    let mut conn = state.store.acquire().await?;
    let submenu = queries::get_submenu(&mut conn, menu_id, submenu_id)
        .await?
        .ok_or(ApiError::NotFound(Resource::Submenu))?;

    tracing::info!("Retrieved submenu {} of menu {}", submenu_id, menu_id);
    Ok((StatusCode::OK, Json(submenu.into())))
}

/// POST /api/v1/menus/{menu_id}/submenus handler - Create a submenu under an existing menu
#[utoipa::path(
    post,
    path = routes::SUBMENUS,
    params(("menu_id" = i64, Path, description = "Menu id")),
    request_body = Details,
    responses(
        (status = 201, description = "Submenu created", body = EntryResponse),
        (status = 400, description = "Invalid id, body or data", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse),
        (status = 404, description = "Menu not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "submenus"
)]
pub async fn create_submenu(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Details>, JsonRejection>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let Path(menu_id) = path?;
    let Json(details) = payload?;

    let mut tx = state.store.begin().await?;
    let id = mutations::create_submenu(&mut tx, menu_id, &details)
        .await?
        .ok_or(ApiError::NotFound(Resource::Menu))?;
    tx.commit().await?;

    tracing::info!("Created submenu {} in menu {}", id, menu_id);
    Ok((StatusCode::CREATED, Json(Entry { id, details }.into())))
}

/// PATCH /api/v1/menus/{menu_id}/submenus/{submenu_id} handler - Update title and description
#[utoipa::path(
    patch,
    path = routes::SUBMENU,
    params(
        ("menu_id" = i64, Path, description = "Menu id"),
        ("submenu_id" = i64, Path, description = "Submenu id")
    ),
    request_body = DetailsUpdate,
    responses(
        (status = 200, description = "Submenu updated", body = EntryResponse),
        (status = 400, description = "Invalid id, body or data", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse),
        (status = 404, description = "Submenu not found under this menu", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "submenus"
)]
pub async fn update_submenu(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
    payload: Result<Json<DetailsUpdate>, JsonRejection>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let Path((menu_id, submenu_id)) = path?;
    let Json(update) = payload?;

    let mut tx = state.store.begin().await?;
    let submenu = mutations::update_submenu(&mut tx, menu_id, submenu_id, &update.into())
        .await?
        .ok_or(ApiError::NotFound(Resource::Submenu))?;
    tx.commit().await?;

    tracing::info!("Updated submenu {} of menu {}", submenu_id, menu_id);
    Ok((StatusCode::OK, Json(submenu.into())))
}

/// DELETE /api/v1/menus/{menu_id}/submenus/{submenu_id} handler - Delete a submenu together with its dishes
#[utoipa::path(
    delete,
    path = routes::SUBMENU,
    params(
        ("menu_id" = i64, Path, description = "Menu id"),
        ("submenu_id" = i64, Path, description = "Submenu id")
    ),
    responses(
        (status = 200, description = "Submenu deleted", body = DeleteResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Submenu not found under this menu", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "submenus"
)]
pub async fn delete_submenu(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    let Path((menu_id, submenu_id)) = path?;

    let mut tx = state.store.begin().await?;
    if !mutations::delete_submenu(&mut tx, menu_id, submenu_id).await? {
        return Err(ApiError::NotFound(Resource::Submenu));
    }
    tx.commit().await?;

    tracing::info!("Deleted submenu {} of menu {}", submenu_id, menu_id);
    Ok((StatusCode::OK, Json(DeleteResponse::deleted(Resource::Submenu))))
}
