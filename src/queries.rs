//! Read side: hierarchy lookups and descendant counts.
//!
//! Counts come from outer joins grouped by the parent id with independent
//! `COUNT(DISTINCT ..)` aggregates, so a parent without children still
//! shows up with zero counts.

use anyhow::{Context, Result};
use sqlx::PgConnection;

use crate::records::{Dish, MenuSummary, SubmenuSummary};

const MENU_SUMMARY: &str = r#"
SELECT
    m.id,
    m.title,
    m.description,
    COUNT(DISTINCT s.id) AS submenus_count,
    COUNT(DISTINCT d.id) AS dishes_count
FROM menus m
LEFT OUTER JOIN submenus s ON s.menu_id = m.id
LEFT OUTER JOIN dishes d ON d.submenu_id = s.id
"#;

const SUBMENU_SUMMARY: &str = r#"
SELECT
    s.id,
    s.title,
    s.description,
    COUNT(DISTINCT d.id) AS dishes_count
FROM menus m
INNER JOIN submenus s ON s.menu_id = m.id
LEFT OUTER JOIN dishes d ON d.submenu_id = s.id
"#;

const DISH_FIELDS: &str = r#"
SELECT
    d.id,
    d.title,
    d.description,
    d.price
FROM menus m
INNER JOIN submenus s ON s.menu_id = m.id
INNER JOIN dishes d ON d.submenu_id = s.id
"#;

/// All menus in id order, each with its submenu and dish counts
pub async fn list_menus(conn: &mut PgConnection) -> Result<Vec<MenuSummary>> {
    let sql = format!("{MENU_SUMMARY} GROUP BY m.id ORDER BY m.id");
    let menus = sqlx::query_as::<_, MenuSummary>(&sql)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list menus")?;

    tracing::debug!("Listed {} menus", menus.len());
    Ok(menus)
}

pub async fn get_menu(conn: &mut PgConnection, menu_id: i64) -> Result<Option<MenuSummary>> {
    let sql = format!("{MENU_SUMMARY} WHERE m.id = $1 GROUP BY m.id");
    let menu = sqlx::query_as::<_, MenuSummary>(&sql)
        .bind(menu_id)
        .fetch_optional(&mut *conn)
        .await
        .with_context(|| format!("Failed to read menu {}", menu_id))?;

    tracing::debug!("Read menu {}: found={}", menu_id, menu.is_some());
    Ok(menu)
}

/// Submenus of one menu in id order, each with its dish count
///
/// A menu that does not exist simply has no submenus.
pub async fn list_submenus(conn: &mut PgConnection, menu_id: i64) -> Result<Vec<SubmenuSummary>> {
    let sql = format!("{SUBMENU_SUMMARY} WHERE m.id = $1 GROUP BY s.id ORDER BY s.id");
    let submenus = sqlx::query_as::<_, SubmenuSummary>(&sql)
        .bind(menu_id)
        .fetch_all(&mut *conn)
        .await
        .with_context(|| format!("Failed to list submenus of menu {}", menu_id))?;

    tracing::debug!("Listed {} submenus of menu {}", submenus.len(), menu_id);
    Ok(submenus)
}

pub async fn get_submenu(
    conn: &mut PgConnection,
    menu_id: i64,
    submenu_id: i64,
) -> Result<Option<SubmenuSummary>> {
    let sql = format!("{SUBMENU_SUMMARY} WHERE m.id = $1 AND s.id = $2 GROUP BY s.id");
    let submenu = sqlx::query_as::<_, SubmenuSummary>(&sql)
        .bind(menu_id)
        .bind(submenu_id)
        .fetch_optional(&mut *conn)
        .await
        .with_context(|| format!("Failed to read submenu {}", submenu_id))?;

    Ok(submenu)
}

pub async fn list_dishes(conn: &mut PgConnection, menu_id: i64, submenu_id: i64) -> Result<Vec<Dish>> {
    let sql = format!("{DISH_FIELDS} WHERE m.id = $1 AND s.id = $2 ORDER BY d.id");
    let dishes = sqlx::query_as::<_, Dish>(&sql)
        .bind(menu_id)
        .bind(submenu_id)
        .fetch_all(&mut *conn)
        .await
        .with_context(|| format!("Failed to list dishes of submenu {}", submenu_id))?;

    tracing::debug!("Listed {} dishes of submenu {}", dishes.len(), submenu_id);
    Ok(dishes)
}

pub async fn get_dish(
    conn: &mut PgConnection,
    menu_id: i64,
    submenu_id: i64,
    dish_id: i64,
) -> Result<Option<Dish>> {
    let sql = format!("{DISH_FIELDS} WHERE m.id = $1 AND s.id = $2 AND d.id = $3");
    let dish = sqlx::query_as::<_, Dish>(&sql)
        .bind(menu_id)
        .bind(submenu_id)
        .bind(dish_id)
        .fetch_optional(&mut *conn)
        .await
        .with_context(|| format!("Failed to read dish {}", dish_id))?;

    Ok(dish)
}
