// Route path constants - single source of truth for all API paths

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const MENUS: &str = "/api/v1/menus";
pub const MENU: &str = "/api/v1/menus/{menu_id}";
pub const SUBMENUS: &str = "/api/v1/menus/{menu_id}/submenus";
pub const SUBMENU: &str = "/api/v1/menus/{menu_id}/submenus/{submenu_id}";
pub const DISHES: &str = "/api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes";
pub const DISH: &str = "/api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id}";
pub const DOCS: &str = "/docs";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH, get(handlers::health_handler))
        .route(MENUS, get(handlers::menus::list_menus).post(handlers::menus::create_menu))
        .route(
            MENU,
            get(handlers::menus::get_menu)
                .patch(handlers::menus::update_menu)
                .delete(handlers::menus::delete_menu),
        )
        .route(
            SUBMENUS,
            get(handlers::submenus::list_submenus).post(handlers::submenus::create_submenu),
        )
        .route(
            SUBMENU,
            get(handlers::submenus::get_submenu)
                .patch(handlers::submenus::update_submenu)
                .delete(handlers::submenus::delete_submenu),
        )
        .route(
            DISHES,
            get(handlers::dishes::list_dishes).post(handlers::dishes::create_dish),
        )
        .route(
            DISH,
            get(handlers::dishes::get_dish)
                .patch(handlers::dishes::update_dish)
                .delete(handlers::dishes::delete_dish),
        )
        .with_state(state)
        .merge(SwaggerUi::new(DOCS).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
