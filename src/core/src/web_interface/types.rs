use serde::Serialize;
use serde_json::{Map, Value};

use crate::records::Notification;

/// API error payload
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reply to a sub-resource delete: the id that was removed.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: i64,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct UserUpdatedResponse {
    pub message: String,
    pub user: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct NotificationAddedResponse {
    pub message: String,
    pub notification: Notification,
}
