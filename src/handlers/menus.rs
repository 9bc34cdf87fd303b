use crate::error::{ApiError, ErrorResponse, Resource};
use crate::models::{DeleteResponse, DetailsUpdate, EntryResponse, MenuResponse};
use crate::records::{Details, Entry};
use crate::state::AppState;
use crate::{mutations, queries, routes};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /api/v1/menus handler - List menus with their counts
#[utoipa::path(
    get,
    path = routes::MENUS,
    responses(
        (status = 200, description = "All menus in creation order", body = [MenuResponse]),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "menus"
)]
pub async fn list_menus(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<MenuResponse>>), ApiError> {
    let mut conn = state.store.acquire().await?;
    let menus = queries::list_menus(&mut conn).await?;

    tracing::info!("Listed {} menus", menus.len());
    Ok((
        StatusCode::OK,
        Json(menus.into_iter().map(MenuResponse::from).collect()),
    ))
}

/// GET /api/v1/menus/{menu_id} handler
#[utoipa::path(
    get,
    path = routes::MENU,
    params(("menu_id" = i64, Path, description = "Menu id")),
    responses(
        (status = 200, description = "Menu found", body = MenuResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Menu not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "menus"
)]
pub async fn get_menu(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<(StatusCode, Json<MenuResponse>), ApiError> {
    let Path(menu_id) = path?;

    let mut conn = state.store.acquire().await?;
    match queries::get_menu(&mut conn, menu_id).await? {
        Some(menu) => {
            tracing::info!("Retrieved menu {}", menu_id);
            Ok((StatusCode::OK, Json(menu.into())))
        }
        None => {
            tracing::info!("Menu not found: {}", menu_id);
            Err(ApiError::NotFound(Resource::Menu))
        }
    }
}

/// POST /api/v1/menus handler - Create a menu
#[utoipa::path(
    post,
    path = routes::MENUS,
    request_body = Details,
    responses(
        (status = 201, description = "Menu created", body = EntryResponse),
        (status = 400, description = "Invalid body or rejected data", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "menus"
)]
pub async fn create_menu(
    State(state): State<AppState>,
    payload: Result<Json<Details>, JsonRejection>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let Json(details) = payload?;

    let mut tx = state.store.begin().await?;
    let id = mutations::create_menu(&mut tx, &details).await?;
    tx.commit().await?;

    tracing::info!("Created menu {}", id);
    Ok((StatusCode::CREATED, Json(Entry { id, details }.into())))
}

/// PATCH /api/v1/menus/{menu_id} handler - Update title and description
#[utoipa::path(
    patch,
    path = routes::MENU,
    params(("menu_id" = i64, Path, description = "Menu id")),
    request_body = DetailsUpdate,
    responses(
        (status = 200, description = "Menu updated", body = EntryResponse),
        (status = 400, description = "Invalid id, body or data", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse),
        (status = 404, description = "Menu not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "menus"
)]
pub async fn update_menu(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DetailsUpdate>, JsonRejection>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let Path(menu_id) = path?;
    let Json(update) = payload?;

    let mut tx = state.store.begin().await?;
    let menu = mutations::update_menu(&mut tx, menu_id, &update.into())
        .await?
        .ok_or(ApiError::NotFound(Resource::Menu))?;
    tx.commit().await?;

    tracing::info!("Updated menu {}", menu_id);
    Ok((StatusCode::OK, Json(menu.into())))
}

/// DELETE /api/v1/menus/{menu_id} handler - Delete a menu with everything beneath it
#[utoipa::path(
    delete,
    path = routes::MENU,
    params(("menu_id" = i64, Path, description = "Menu id")),
    responses(
        (status = 200, description = "Menu deleted", body = DeleteResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Menu not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "menus"
)]
pub async fn delete_menu(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    let Path(menu_id) = path?;

    let mut tx = state.store.begin().await?;
    if !mutations::delete_menu(&mut tx, menu_id).await? {
        return Err(ApiError::NotFound(Resource::Menu));
    }
    tx.commit().await?;

    tracing::info!("Deleted menu {}", menu_id);
    Ok((StatusCode::OK, Json(DeleteResponse::deleted(Resource::Menu))))
}
