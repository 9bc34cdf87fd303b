use serde::{Deserialize, Serialize};

use crate::error::Resource;
use crate::mutations::DetailsPatch;
use crate::records::{Details, Dish, Entry, MenuSummary, SubmenuSummary};

/// Request body for creating a dish
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DishPayload {
    #[serde(flatten)]
    pub details: Details,
    pub price: String,
}

/// Request body for updating a menu or submenu; absent fields stay as they are
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct DetailsUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<DetailsUpdate> for DetailsPatch {
    fn from(update: DetailsUpdate) -> Self {
        DetailsPatch {
            title: update.title,
            description: update.description,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DishUpdate {
    #[serde(flatten)]
    pub details: DetailsUpdate,
    pub price: Option<String>,
}

/// Menu with aggregate counts
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MenuResponse {
    pub id: String,
    #[serde(flatten)]
    pub details: Details,
    pub submenus_count: i64,
    pub dishes_count: i64,
}

impl From<MenuSummary> for MenuResponse {
    fn from(menu: MenuSummary) -> Self {
        MenuResponse {
            id: menu.id.to_string(),
            details: menu.details,
            submenus_count: menu.submenus_count,
            dishes_count: menu.dishes_count,
        }
    }
}

/// Submenu with its dish count
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SubmenuResponse {
    pub id: String,
    #[serde(flatten)]
    pub details: Details,
    pub dishes_count: i64,
}

impl From<SubmenuSummary> for SubmenuResponse {
    fn from(submenu: SubmenuSummary) -> Self {
        SubmenuResponse {
            id: submenu.id.to_string(),
            details: submenu.details,
            dishes_count: submenu.dishes_count,
        }
    }
}

/// Menu or submenu as created or updated, without counts
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EntryResponse {
    pub id: String,
    #[serde(flatten)]
    pub details: Details,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        EntryResponse {
            id: entry.id.to_string(),
            details: entry.details,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DishResponse {
    pub id: String,
    #[serde(flatten)]
    pub details: Details,
    pub price: String,
}

impl From<Dish> for DishResponse {
    fn from(dish: Dish) -> Self {
        DishResponse {
            id: dish.id.to_string(),
            details: dish.details,
            price: dish.price,
        }
    }
}

/// Response type for successful DELETE operations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub status: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted(resource: Resource) -> Self {
        DeleteResponse {
            status: true,
            message: format!("{} deleted", resource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details() -> Details {
        Details {
            title: "My menu 1".to_string(),
            description: "My menu description 1".to_string(),
        }
    }

    #[test]
    fn test_menu_response_flattens_details_and_stringifies_id() {
        let response = MenuResponse::from(MenuSummary {
            id: 7,
            details: details(),
            submenus_count: 2,
            dishes_count: 3,
        });

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "id": "7",
                "title": "My menu 1",
                "description": "My menu description 1",
                "submenus_count": 2,
                "dishes_count": 3
            })
        );
    }

    #[test]
    fn test_dish_response_keeps_price_as_string() {
        let response = DishResponse::from(Dish {
            id: 12,
            details: details(),
            price: "12.50".to_string(),
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], json!("12"));
        assert_eq!(value["price"], json!("12.50"));
        assert_eq!(value["title"], json!("My menu 1"));
    }

    #[test]
    fn test_entry_response_has_no_counts() {
        let value = serde_json::to_value(EntryResponse::from(Entry { id: 1, details: details() })).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert!(!object.contains_key("submenus_count"));
    }

    #[test]
    fn test_dish_payload_requires_price() {
        let payload: DishPayload = serde_json::from_value(json!({
            "title": "Soup",
            "description": "Hot",
            "price": "4.20"
        }))
        .unwrap();
        assert_eq!(payload.details.title, "Soup");
        assert_eq!(payload.price, "4.20");

        let missing = serde_json::from_value::<DishPayload>(json!({"title": "Soup", "description": "Hot"}));
        assert!(missing.is_err());
    }

    #[test]
    fn test_dish_update_fields_are_optional() {
        let update: DishUpdate = serde_json::from_value(json!({"price": "5.00"})).unwrap();
        assert_eq!(update.price.as_deref(), Some("5.00"));
        assert_eq!(DetailsPatch::from(update.details), DetailsPatch::default());
    }

    #[test]
    fn test_delete_response_message() {
        let response = DeleteResponse::deleted(Resource::Submenu);
        assert!(response.status);
        assert_eq!(response.message, "submenu deleted");
    }
}
