use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use super::coerce::{self, Record};
use crate::model::{Category, Modification, Product, Tag};

/// Sort position for items the upstream left unordered.
pub const SORT_SENTINEL: i64 = 9999;

/// Stable sort by `(sortIndex, name)`; missing or zero `sortIndex` sorts last,
/// missing `name` first. Fractional indexes compare untruncated.
pub fn sort_upstream<'a>(items: &[&'a Record]) -> Vec<&'a Record> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let (ia, na) = sort_key(a);
        let (ib, nb) = sort_key(b);
        ia.total_cmp(&ib).then_with(|| na.cmp(nb))
    });
    sorted
}

fn sort_key(item: &Record) -> (f64, &str) {
    (
        coerce::number(item.get("sortIndex"))
            .filter(|n| *n != 0.0)
            .unwrap_or(SORT_SENTINEL as f64),
        item.get("name").and_then(Value::as_str).unwrap_or(""),
    )
}

/// Walk items in sort order and keep the first one per trimmed `code`.
///
/// `build` receives the item's 0-based position in the sorted list (skipped
/// items still take up a position) and its code.
pub fn first_by_code<'a, T>(
    items: &[&'a Record],
    mut build: impl FnMut(usize, String, &'a Record) -> T,
) -> Vec<T> {
    let total = items.len();
    let (_, out) = sort_upstream(items).into_iter().enumerate().fold(
        (HashSet::new(), Vec::with_capacity(total)),
        |(mut seen, mut out), (position, item)| {
            let code = coerce::text(item.get("code"));
            if !code.is_empty() && seen.insert(code.clone()) {
                out.push(build(position, code, item));
            }
            (seen, out)
        },
    );

    if out.len() < total {
        debug!(kept = out.len(), dropped = total - out.len(), "Dropped items with empty or duplicate code");
    }
    out
}

pub fn categories(items: &[&Record]) -> Vec<Category> {
    first_by_code(items, |_, code, item| Category {
        id: code.clone(),
        code,
        name: coerce::text(item.get("name")),
        description: coerce::joined_text(item.get("description")),
        sort_order: coerce::int_or(item.get("sortIndex"), SORT_SENTINEL),
        is_active: is_active(item),
        cover_image: coerce::url(item.get("navigationImage")).or_else(|| coerce::url(item.get("logo"))),
    })
}

pub fn products(items: &[&Record], fallback_category: &str) -> Vec<Product> {
    first_by_code(items, |position, code, meal| {
        let images = coerce::strings(meal.get("images"));
        let category_codes = coerce::strings(meal.get("categories"));

        Product {
            id: code.clone(),
            code,
            name: coerce::text(meal.get("name")),
            description: coerce::text(meal.get("description")),
            price: coerce::int(meal.get("price")).unwrap_or(0).max(0),
            old_price: coerce::nonzero_int(meal.get("priceBeforeDiscount")),
            weight: coerce::nonzero_int(meal.get("weight")),
            calories: coerce::nonzero_int(meal.get("calories")),
            volume: coerce::nonzero_int(meal.get("volume")),
            image_url: coerce::url(meal.get("previewImage")).or_else(|| images.first().cloned()),
            images,
            media: coerce::strings(meal.get("media")),
            is_available: is_active(meal),
            sort_order: coerce::int_or(meal.get("sortIndex"), position as i64 + 1),
            category_code: category_codes
                .first()
                .cloned()
                .unwrap_or_else(|| fallback_category.to_string()),
            category_codes,
            tags: coerce::records(meal.get("tags"))
                .map(|t| Tag {
                    code: coerce::text(t.get("code")),
                    text: coerce::text(t.get("text")),
                })
                .collect(),
            modifications: coerce::records(meal.get("modifications"))
                .map(|m| Modification {
                    meal_code: coerce::text(m.get("mealCode")),
                    name: coerce::text(m.get("name")),
                    sort_order: coerce::int(m.get("sortIndex")).unwrap_or(0),
                })
                .collect(),
            topping_groups: match meal.get("toppingGroups") {
                None | Some(Value::Null) => Value::Array(Vec::new()),
                Some(groups) => groups.clone(),
            },
        }
    })
}

fn is_active(item: &Record) -> bool {
    item.get("status").and_then(Value::as_str) == Some("active")
}
