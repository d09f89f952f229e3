//! Contact form submission

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactReason {
    General,
    Reservation,
    Event,
    Feedback,
    Other,
}

/// Message sent from the contact page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, max = 30, message = "phone is invalid"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 200, message = "subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000, message = "message is required"))]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ContactReason>,
}

impl ContactMessage {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            subject: subject.into(),
            message: message.into(),
            reason: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_reason(mut self, reason: ContactReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Checks the form fields before anything is sent
    pub fn check(&self) -> Result<(), ApiError> {
        self.validate()
            .map_err(|errors| ApiError::validation(errors.to_string()))
    }
}

/// Backend acknowledgement for a contact submission
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
