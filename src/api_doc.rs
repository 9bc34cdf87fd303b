use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{
    DeleteResponse, DetailsUpdate, DishPayload, DishResponse, DishUpdate, EntryResponse,
    MenuResponse, SubmenuResponse,
};
use crate::records::Details;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "menu-api",
        version = "1.0.0",
        description = "Menus, submenus and dishes backed by PostgreSQL"
    ),
    paths(
        handlers::health::health_handler,
        handlers::menus::list_menus,
        handlers::menus::get_menu,
        handlers::menus::create_menu,
        handlers::menus::update_menu,
        handlers::menus::delete_menu,
        handlers::submenus::list_submenus,
        handlers::submenus::get_submenu,
        handlers::submenus::create_submenu,
        handlers::submenus::update_submenu,
        handlers::submenus::delete_submenu,
        handlers::dishes::list_dishes,
        handlers::dishes::get_dish,
        handlers::dishes::create_dish,
        handlers::dishes::update_dish,
        handlers::dishes::delete_dish
    ),
    components(
        schemas(
            Details,
            DetailsUpdate,
            DishPayload,
            DishUpdate,
            MenuResponse,
            SubmenuResponse,
            EntryResponse,
            DishResponse,
            DeleteResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "menus", description = "Menu operations"),
        (name = "submenus", description = "Submenu operations"),
        (name = "dishes", description = "Dish operations")
    )
)]
pub struct ApiDoc;
