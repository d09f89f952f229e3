//! Opening hours service

use std::sync::Arc;

use crate::domain::{ApiError, DayOfWeek, OpeningHours, OpeningHoursUpdate};
use crate::infrastructure::http::{HttpClientExt, HttpClientTrait};

#[derive(Debug)]
pub struct OpeningHoursService<C: HttpClientTrait + ?Sized> {
    client: Arc<C>,
}

impl<C: HttpClientTrait + ?Sized> Clone for OpeningHoursService<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: HttpClientTrait + ?Sized> OpeningHoursService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Hours for the whole week
    pub async fn get_opening_hours(&self) -> Result<Vec<OpeningHours>, ApiError> {
        self.client.get("/opening-hours").await
    }

    pub async fn get_opening_hours_for_day(&self, day: DayOfWeek) -> Result<OpeningHours, ApiError> {
        self.client.get(&format!("/opening-hours/{}", day)).await
    }

    pub async fn update_opening_hours(
        &self,
        day: DayOfWeek,
        update: &OpeningHoursUpdate,
    ) -> Result<OpeningHours, ApiError> {
        self.client
            .put(&format!("/opening-hours/{}", day), update)
            .await
    }
}
