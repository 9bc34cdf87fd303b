//! Rows as they come out of the store.

use serde::{Deserialize, Serialize};

/// Title and description, shared by every level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Details {
    pub title: String,
    pub description: String,
}

/// A menu or submenu row without aggregates
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Entry {
    pub id: i64,
    #[sqlx(flatten)]
    pub details: Details,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Dish {
    pub id: i64,
    #[sqlx(flatten)]
    pub details: Details,
    pub price: String,
}

/// A menu with the number of submenus and dishes beneath it
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MenuSummary {
    pub id: i64,
    #[sqlx(flatten)]
    pub details: Details,
    pub submenus_count: i64,
    pub dishes_count: i64,
}

/// A submenu with the number of dishes beneath it
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SubmenuSummary {
    pub id: i64,
    #[sqlx(flatten)]
    pub details: Details,
    pub dishes_count: i64,
}
