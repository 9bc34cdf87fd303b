//! Write side. Every statement is addressed by the full hierarchy path, so a
//! row that does not sit under the named parents is treated as absent.
//!
//! The functions take a bare connection; callers decide the transaction.

use anyhow::{Context, Result};
use sqlx::PgConnection;

use crate::records::{Details, Dish, Entry};

/// Fields to change; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub async fn create_menu(conn: &mut PgConnection, details: &Details) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menus (title, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(&details.title)
    .bind(&details.description)
    .fetch_one(&mut *conn)
    .await
    .context("Failed to insert menu")?;

    tracing::debug!("Inserted menu {}", id);
    Ok(id)
}

/// Insert a submenu, or return `None` when the menu does not exist
pub async fn create_submenu(conn: &mut PgConnection, menu_id: i64, details: &Details) -> Result<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar(
        r#"
INSERT INTO submenus (menu_id, title, description)
SELECT m.id, $2, $3 FROM menus m WHERE m.id = $1
RETURNING id"#,
    )
    .bind(menu_id)
    .bind(&details.title)
    .bind(&details.description)
    .fetch_optional(&mut *conn)
    .await
    .with_context(|| format!("Failed to insert submenu into menu {}", menu_id))?;

    tracing::debug!("Inserted submenu {:?} into menu {}", id, menu_id);
    Ok(id)
}

/// Insert a dish, or return `None` when no such submenu belongs to the menu
pub async fn create_dish(
    conn: &mut PgConnection,
    menu_id: i64,
    submenu_id: i64,
    details: &Details,
    price: &str,
) -> Result<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar(
        r#"
INSERT INTO dishes (submenu_id, title, description, price)
SELECT s.id, $3, $4, $5 FROM submenus s WHERE s.id = $2 AND s.menu_id = $1
RETURNING id"#,
    )
    .bind(menu_id)
    .bind(submenu_id)
    .bind(&details.title)
    .bind(&details.description)
    .bind(price)
    .fetch_optional(&mut *conn)
    .await
    .with_context(|| format!("Failed to insert dish into submenu {}", submenu_id))?;

    tracing::debug!("Inserted dish {:?} into submenu {}", id, submenu_id);
    Ok(id)
}

pub async fn update_menu(conn: &mut PgConnection, menu_id: i64, patch: &DetailsPatch) -> Result<Option<Entry>> {
    let menu = sqlx::query_as::<_, Entry>(
        r#"
UPDATE menus
SET title = COALESCE($2, title), description = COALESCE($3, description)
WHERE id = $1
RETURNING id, title, description"#,
    )
    .bind(menu_id)
    .bind(patch.title.as_deref())
    .bind(patch.description.as_deref())
    .fetch_optional(&mut *conn)
    .await
    .with_context(|| format!("Failed to update menu {}", menu_id))?;

    Ok(menu)
}

pub async fn update_submenu(
    conn: &mut PgConnection,
    menu_id: i64,
    submenu_id: i64,
    patch: &DetailsPatch,
) -> Result<Option<Entry>> {
    let submenu = sqlx::query_as::<_, Entry>(
        r#"
UPDATE submenus
SET title = COALESCE($3, title), description = COALESCE($4, description)
WHERE menu_id = $1 AND id = $2
RETURNING id, title, description"#,
    )
    .bind(menu_id)
    .bind(submenu_id)
    .bind(patch.title.as_deref())
    .bind(patch.description.as_deref())
    .fetch_optional(&mut *conn)
    .await
    .with_context(|| format!("Failed to update submenu {}", submenu_id))?;

    Ok(submenu)
}

pub async fn update_dish(
    conn: &mut PgConnection,
    menu_id: i64,
    submenu_id: i64,
    dish_id: i64,
    patch: &DetailsPatch,
    price: Option<&str>,
) -> Result<Option<Dish>> {
    let dish = sqlx::query_as::<_, Dish>(
        r#"
UPDATE dishes d
SET title = COALESCE($4, d.title),
    description = COALESCE($5, d.description),
    price = COALESCE($6, d.price)
FROM submenus s
WHERE d.id = $3 AND d.submenu_id = s.id AND s.id = $2 AND s.menu_id = $1
RETURNING d.id, d.title, d.description, d.price"#,
    )
    .bind(menu_id)
    .bind(submenu_id)
    .bind(dish_id)
    .bind(patch.title.as_deref())
    .bind(patch.description.as_deref())
    .bind(price)
    .fetch_optional(&mut *conn)
    .await
    .with_context(|| format!("Failed to update dish {}", dish_id))?;

    Ok(dish)
}

/// Delete a menu with all its submenus and dishes; `false` when absent
pub async fn delete_menu(conn: &mut PgConnection, menu_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM menus WHERE id = $1")
        .bind(menu_id)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to delete menu {}", menu_id))?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_submenu(conn: &mut PgConnection, menu_id: i64, submenu_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM submenus WHERE menu_id = $1 AND id = $2")
        .bind(menu_id)
        .bind(submenu_id)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to delete submenu {}", submenu_id))?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_dish(conn: &mut PgConnection, menu_id: i64, submenu_id: i64, dish_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
DELETE FROM dishes d
USING submenus s
WHERE d.id = $3 AND d.submenu_id = s.id AND s.id = $2 AND s.menu_id = $1"#,
    )
    .bind(menu_id)
    .bind(submenu_id)
    .bind(dish_id)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to delete dish {}", dish_id))?;

    Ok(result.rows_affected() > 0)
}
