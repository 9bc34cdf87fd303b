use crate::error::{ApiError, ErrorResponse, Resource};
use crate::models::{DeleteResponse, DishPayload, DishResponse, DishUpdate};
use crate::records::Dish;
use crate::state::AppState;
use crate::{mutations, queries, routes};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes handler - List dishes of a submenu
#[utoipa::path(
    get,
    path = routes::DISHES,
    params(
        ("menu_id" = i64, Path, description = "Menu id"),
        ("submenu_id" = i64, Path, description = "Submenu id")
    ),
    responses(
        (status = 200, description = "Dishes of the submenu", body = [DishResponse]),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "dishes"
)]
pub async fn list_dishes(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<(StatusCode, Json<Vec<DishResponse>>), ApiError> {
    let Path((menu_id, submenu_id)) = path?;

    let mut conn = state.store.acquire().await?;
    let dishes = queries::list_dishes(&mut conn, menu_id, submenu_id).await?;

    tracing::info!("Listed {} dishes of submenu {}", dishes.len(), submenu_id);
    Ok((
        StatusCode::OK,
        Json(dishes.into_iter().map(DishResponse::from).collect()),
    ))
}

/// GET /api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id} handler
#[utoipa::path(
    get,
    path = routes::DISH,
    params(
        ("menu_id" = i64, Path, description = "Menu id"),
        ("submenu_id" = i64, Path, description = "Submenu id"),
        ("dish_id" = i64, Path, description = "Dish id")
    ),
    responses(
        (status = 200, description = "Dish found", body = DishResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Dish not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "dishes"
)]
pub async fn get_dish(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64, i64)>, PathRejection>,
) -> Result<(StatusCode, Json<DishResponse>), ApiError> {
    let Path((menu_id, submenu_id, dish_id)) = path?;

    let mut conn = state.store.acquire().await?;
    let dish = queries::get_dish(&mut conn, menu_id, submenu_id, dish_id)
        .await?
        .ok_or(ApiError::NotFound(Resource::Dish))?;

    tracing::info!("Retrieved dish {}", dish_id);
    Ok((StatusCode::OK, Json(dish.into())))
}

/// POST /api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes handler - Create a dish under a submenu of this menu
#[utoipa::path(
    post,
    path = routes::DISHES,
    params(
        ("menu_id" = i64, Path, description = "Menu id"),
        ("submenu_id" = i64, Path, description = "Submenu id")
    ),
    request_body = DishPayload,
    responses(
        (status = 201, description = "Dish created", body = DishResponse),
        (status = 400, description = "Invalid id, body or data", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse),
        (status = 404, description = "Submenu not found under this menu", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "dishes"
)]
pub async fn create_dish(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
    payload: Result<Json<DishPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<DishResponse>), ApiError> {
    let Path((menu_id, submenu_id)) = path?;
    let Json(DishPayload { details, price }) = payload?;

    let mut tx = state.store.begin().await?;
    let id = mutations::create_dish(&mut tx, menu_id, submenu_id, &details, &price)
        .await?
        .ok_or(ApiError::NotFound(Resource::Submenu))?;
    tx.commit().await?;

    tracing::info!("Created dish {} in submenu {}", id, submenu_id);
    Ok((StatusCode::CREATED, Json(Dish { id, details, price }.into())))
}

/// PATCH /api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id} handler - Update any of title, description and price
#[utoipa::path(
    patch,
    path = routes::DISH,
    params(
        ("menu_id" = i64, Path, description = "Menu id"),
        ("submenu_id" = i64, Path, description = "Submenu id"),
        ("dish_id" = i64, Path, description = "Dish id")
    ),
    request_body = DishUpdate,
    responses(
        (status = 200, description = "Dish updated", body = DishResponse),
        (status = 400, description = "Invalid id, body or data", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse),
        (status = 404, description = "Dish not found under this path", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "dishes"
)]
pub async fn update_dish(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64, i64)>, PathRejection>,
    payload: Result<Json<DishUpdate>, JsonRejection>,
) -> Result<(StatusCode, Json<DishResponse>), ApiError> {
    let Path((menu_id, submenu_id, dish_id)) = path?;
    let Json(DishUpdate { details, price }) = payload?;

    let mut tx = state.store.begin().await?;
    let dish = mutations::update_dish(
        &mut tx,
        menu_id,
        submenu_id,
        dish_id,
        &details.into(),
        price.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound(Resource::Dish))?;
    tx.commit().await?;

    tracing::info!("Updated dish {}", dish_id);
    Ok((StatusCode::OK, Json(dish.into())))
}

/// DELETE /api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id} handler
#[utoipa::path(
    delete,
    path = routes::DISH,
    params(
        ("menu_id" = i64, Path, description = "Menu id"),
        ("submenu_id" = i64, Path, description = "Submenu id"),
        ("dish_id" = i64, Path, description = "Dish id")
    ),
    responses(
        (status = 200, description = "Dish deleted", body = DeleteResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Dish not found under this path", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "dishes"
)]
pub async fn delete_dish(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64, i64)>, PathRejection>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    let Path((menu_id, submenu_id, dish_id)) = path?;

    let mut tx = state.store.begin().await?;
    if !mutations::delete_dish(&mut tx, menu_id, submenu_id, dish_id).await? {
        return Err(ApiError::NotFound(Resource::Dish));
    }
    tx.commit().await?;

    tracing::info!("Deleted dish {}", dish_id);
    Ok((StatusCode::OK, Json(DeleteResponse::deleted(Resource::Dish))))
}
