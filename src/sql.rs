//! Idempotent Postgres seed (`supabase/seed.sql`) built from a seed document.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{Result, SeedError};
use crate::model::{Category, Product, SeedDocument};

const SETTINGS_UPSERT: &str =
    "on conflict (key) do update set value = excluded.value, updated_at = now();";

const CATEGORY_INSERT: &str =
    "insert into public.categories (code, name, description, sort_order, is_active, cover_image) values";
const CATEGORY_UPSERT: &str = "on conflict (code) do update set \
     name = excluded.name, description = excluded.description, sort_order = excluded.sort_order, \
     is_active = excluded.is_active, cover_image = excluded.cover_image, updated_at = now();";

const PRODUCT_INSERT: &str = "insert into public.products \
     (code, name, description, category_code, price, old_price, weight, calories, volume, image_url, \
     images, media, is_available, sort_order, tags, modifications, topping_groups) values";
const PRODUCT_UPSERT: &str = "on conflict (code) do update set \
     name = excluded.name, description = excluded.description, category_code = excluded.category_code, \
     price = excluded.price, old_price = excluded.old_price, weight = excluded.weight, calories = excluded.calories, \
     volume = excluded.volume, image_url = excluded.image_url, images = excluded.images, media = excluded.media, \
     is_available = excluded.is_available, sort_order = excluded.sort_order, tags = excluded.tags, \
     modifications = excluded.modifications, topping_groups = excluded.topping_groups, updated_at = now();";

pub fn render(seed: &SeedDocument) -> Result<String> {
    let mut lines = vec![
        "-- Generated from data/kgsushi.seed.json".to_string(),
        "-- Load after supabase/schema.sql".to_string(),
        String::new(),
    ];

    for (key, value) in [
        ("site", to_value(&seed.site)?),
        ("banners", to_value(&seed.banners)?),
        ("theme", to_value(&seed.theme)?),
    ] {
        lines.push(format!(
            "insert into public.settings (key, value) values ({}, {}) {}",
            literal(&json!(key)),
            literal(&value),
            SETTINGS_UPSERT
        ));
    }
    lines.push(String::new());

    for category in &seed.categories {
        lines.push(statement(CATEGORY_INSERT, &category_row(category), CATEGORY_UPSERT));
    }
    lines.push(String::new());

    for product in &seed.products {
        lines.push(statement(PRODUCT_INSERT, &product_row(product)?, PRODUCT_UPSERT));
    }

    let mut sql = lines.join("\n");
    sql.push('\n');
    Ok(sql)
}

fn category_row(c: &Category) -> Vec<Value> {
    vec![
        json!(c.code),
        json!(c.name),
        json!(c.description),
        json!(c.sort_order),
        json!(c.is_active),
        json!(c.cover_image.as_deref().unwrap_or("")),
    ]
}

fn product_row(p: &Product) -> Result<Vec<Value>> {
    Ok(vec![
        json!(p.code),
        json!(p.name),
        json!(p.description),
        json!(p.category_code),
        json!(p.price),
        json!(p.old_price),
        json!(p.weight),
        json!(p.calories),
        json!(p.volume),
        json!(p.image_url.as_deref().unwrap_or("")),
        json!(p.images),
        json!(p.media),
        json!(p.is_available),
        json!(p.sort_order),
        to_value(&p.tags)?,
        to_value(&p.modifications)?,
        match &p.topping_groups {
            Value::Null => json!([]),
            groups => groups.clone(),
        },
    ])
}

fn statement(insert: &str, row: &[Value], upsert: &str) -> String {
    let values: Vec<String> = row.iter().map(literal).collect();
    format!("{} ({}) {}", insert, values.join(", "), upsert)
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|source| SeedError::Encode { what: "SQL value", source })
}

/// SQL literal for a JSON value. Lists and records become `jsonb`.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(_) | Value::Object(_) => format!("{}::jsonb", quote(&value.to_string())),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
