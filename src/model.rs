use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root of `data/kgsushi.seed.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedDocument {
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub site: SiteMetadata,
    pub theme: Theme,
    pub banners: Vec<Banner>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    pub title: String,
    pub brand: String,
    pub city: String,
    pub phone: String,
    pub address: Address,
    pub working_hours: WorkingHours,
    pub order_methods: Vec<String>,
    pub currency: String,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub house: String,
}

/// Opening and closing time as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub root_css_variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: String,
    pub code: String,
    pub title: String,
    pub image: Option<String>,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub old_price: Option<i64>,
    pub weight: Option<i64>,
    pub calories: Option<i64>,
    pub volume: Option<i64>,
    pub image_url: Option<String>,
    pub images: Vec<String>,
    pub media: Vec<String>,
    pub is_available: bool,
    pub sort_order: i64,
    pub category_code: String,
    pub category_codes: Vec<String>,
    pub tags: Vec<Tag>,
    pub modifications: Vec<Modification>,
    /// Passed through untouched.
    pub topping_groups: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub code: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modification {
    pub meal_code: String,
    pub name: String,
    pub sort_order: i64,
}
