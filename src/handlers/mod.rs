pub mod dishes;
pub mod health;
pub mod menus;
pub mod submenus;

pub use health::health_handler;
