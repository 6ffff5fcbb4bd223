use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: Uuid,
    pub full_name: String,
    pub specialization: String,
    pub experience_years: Option<i32>,
    pub phone: String,
    pub email: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAgent {
    pub full_name: String,
    pub specialization: String,
    pub experience_years: Option<i32>,
    pub phone: String,
    pub email: String,
    pub photo_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct AgentUpdate {
    pub full_name: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}
