//! Menu entities

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Menu category (starters, mains, drinks...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A dish or drink on the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<MenuCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergens: Vec<String>,
}

impl MenuItem {
    pub fn belongs_to(&self, category_id: i64) -> bool {
        self.category_id == Some(category_id)
            || self.category.as_ref().is_some_and(|c| c.id == category_id)
    }
}

/// Body for creating or replacing a menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergens: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_menu_item_defaults() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": 1,
            "name": "Fish & Chips",
            "price": 14.5,
            "categoryId": 2
        }))
        .unwrap();

        assert!(item.is_available);
        assert!(!item.is_featured);
        assert!(item.allergens.is_empty());
        assert!(item.belongs_to(2));
        assert!(!item.belongs_to(3));
    }

    #[test]
    fn test_menu_item_with_nested_category() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": 4,
            "name": "Stout",
            "price": 6.0,
            "category": {"id": 9, "name": "Drinks", "displayOrder": 3}
        }))
        .unwrap();

        assert!(item.belongs_to(9));
        assert_eq!(item.category.unwrap().display_order, 3);
    }
}
