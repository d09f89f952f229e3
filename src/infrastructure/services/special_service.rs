//! Special service - daily and seasonal specials

use std::sync::Arc;

use crate::domain::{ApiError, Special};
use crate::infrastructure::http::{HttpClientExt, HttpClientTrait};

#[derive(Debug)]
pub struct SpecialService<C: HttpClientTrait + ?Sized> {
    client: Arc<C>,
}

impl<C: HttpClientTrait + ?Sized> Clone for SpecialService<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: HttpClientTrait + ?Sized> SpecialService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn get_specials(&self) -> Result<Vec<Special>, ApiError> {
        self.client.get("/specials").await
    }

    pub async fn get_active_specials(&self) -> Result<Vec<Special>, ApiError> {
        self.client.get("/specials/active").await
    }

    pub async fn get_special(&self, id: i64) -> Result<Special, ApiError> {
        self.client.get(&format!("/specials/{}", id)).await
    }
}
