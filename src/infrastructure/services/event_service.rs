//! Event service - event listings

use std::sync::Arc;

use crate::domain::{ApiError, Event};
use crate::infrastructure::http::{HttpClientExt, HttpClientTrait};

#[derive(Debug)]
pub struct EventService<C: HttpClientTrait + ?Sized> {
    client: Arc<C>,
}

impl<C: HttpClientTrait + ?Sized> Clone for EventService<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: HttpClientTrait + ?Sized> EventService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn get_events(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/events").await
    }

    /// Events currently flagged active by the backend
    pub async fn get_active_events(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/events/active").await
    }

    pub async fn get_upcoming_events(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/events/upcoming").await
    }

    pub async fn get_event(&self, id: i64) -> Result<Event, ApiError> {
        self.client.get(&format!("/events/{}", id)).await
    }
}
