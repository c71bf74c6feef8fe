use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDTO {
    #[serde(rename = "id")]
    pub id: i64,
    #[serde(rename = "email")]
    #[sqlx(rename = "email_address")]
    pub email: String,
    #[serde(rename = "display_name")]
    pub display_name: Option<String>,
    #[serde(rename = "is_active")]
    pub is_active: bool,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub audit: AuditFields,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserDTO {
    #[serde(rename = "email")]
    pub email: String,
    #[serde(rename = "password")]
    #[dto(scope = "write")]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserDTO {
    #[serde(rename = "display_name")]
    pub display_name: Option<String>,
}

pub struct AuditFields {
    pub updated_by: String,
}
