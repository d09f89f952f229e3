//! Contact service - contact form submissions

use std::sync::Arc;

use tracing::debug;

use crate::domain::{ApiError, ContactMessage, ContactResponse};
use crate::infrastructure::http::{HttpClientExt, HttpClientTrait};

#[derive(Debug)]
pub struct ContactService<C: HttpClientTrait + ?Sized> {
    client: Arc<C>,
}

impl<C: HttpClientTrait + ?Sized> Clone for ContactService<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: HttpClientTrait + ?Sized> ContactService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Submit a contact message.
    ///
    /// The message is validated locally first; an invalid message never reaches the backend.
    pub async fn submit(&self, message: &ContactMessage) -> Result<ContactResponse, ApiError> {
        message.check()?;

        debug!(reason = ?message.reason, "Submitting contact message");
        self.client.post("/contact", message).await
    }
}
