//! Menu service - menu items and categories

use std::sync::Arc;

use serde_json::json;

use crate::domain::{ApiError, MenuCategory, MenuItem, MenuItemRequest};
use crate::infrastructure::http::{HttpClientExt, HttpClientTrait};

/// Menu service backed by the `/menu` endpoints
#[derive(Debug)]
pub struct MenuService<C: HttpClientTrait + ?Sized> {
    client: Arc<C>,
}

impl<C: HttpClientTrait + ?Sized> Clone for MenuService<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: HttpClientTrait + ?Sized> MenuService<C> {
    /// Create a new MenuService with the given client
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// List all menu items
    pub async fn get_items(&self) -> Result<Vec<MenuItem>, ApiError> {
        self.client.get("/menu/items").await
    }

    /// Get a menu item by ID
    pub async fn get_item(&self, id: i64) -> Result<MenuItem, ApiError> {
        self.client.get(&format!("/menu/items/{}", id)).await
    }

    /// List all menu categories
    pub async fn get_categories(&self) -> Result<Vec<MenuCategory>, ApiError> {
        self.client.get("/menu/categories").await
    }

    /// List the items of one category
    pub async fn get_items_by_category(&self, category_id: i64) -> Result<Vec<MenuItem>, ApiError> {
        self.client
            .get(&format!("/menu/categories/{}/items", category_id))
            .await
    }

    /// Create a new menu item
    pub async fn create_item(&self, request: &MenuItemRequest) -> Result<MenuItem, ApiError> {
        self.client.post("/menu/items", request).await
    }

    /// Replace an existing menu item
    pub async fn update_item(
        &self,
        id: i64,
        request: &MenuItemRequest,
    ) -> Result<MenuItem, ApiError> {
        self.client.put(&format!("/menu/items/{}", id), request).await
    }

    /// Mark an item as (un)available without touching other fields
    pub async fn set_item_availability(
        &self,
        id: i64,
        is_available: bool,
    ) -> Result<MenuItem, ApiError> {
        self.client
            .patch(
                &format!("/menu/items/{}", id),
                &json!({ "isAvailable": is_available }),
            )
            .await
    }

    /// Delete a menu item
    pub async fn delete_item(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete::<serde_json::Value>(&format!("/menu/items/{}", id))
            .await
            .map(|_| ())
    }
}
