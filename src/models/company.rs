use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub employee_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn status_display(&self) -> &'static str {
        if self.is_active {
            "active"
        } else {
            "suspended"
        }
    }
}

/// Payload for creating or updating a company
#[derive(Debug, Clone, Serialize, Default)]
pub struct CompanyInput {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
