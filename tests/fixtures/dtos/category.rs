use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryDTO {
    #[serde(rename = "id")]
    pub id: i32,
    #[serde(rename = "title")]
    pub title: String,
    #[serde(rename = "weight")]
    pub weight: f64,
    #[serde(rename = "metadata")]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(rename = "attributes")]
    pub attributes: serde_json::Value,
}
