pub mod catalog;
pub mod coerce;
pub mod site;
pub mod upstream;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::extract;
use crate::model::{SeedDocument, Theme};
use upstream::UpstreamState;

/// Inputs to normalization that are not part of the page itself.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub source_url: String,
    pub fallback_category: String,
}

/// Map the decoded page state onto a seed document.
///
/// Pure: the same state, markup and timestamp always give the same document.
pub fn normalize(
    next_data: &Value,
    html: &str,
    generated_at: DateTime<Utc>,
    opts: &NormalizeOptions,
) -> Result<SeedDocument> {
    let state = UpstreamState::project(next_data)?;

    let categories = catalog::categories(&state.categories);
    let products = catalog::products(&state.meals, &opts.fallback_category);
    let banners = site::banners(&state.banners);

    let phone = extract::extract_phone(html);
    if phone.is_none() {
        warn!("No tel: link in page, using fallback phone {}", site::PHONE);
    }
    let root_css_variables = extract::parse_root_style_vars(html);
    if root_css_variables.is_empty() {
        warn!("No CSS variables on root element, theme will be empty");
    }

    info!(
        "Normalized {} categories, {} products, {} banners",
        categories.len(),
        products.len(),
        banners.len()
    );

    Ok(SeedDocument {
        source: opts.source_url.clone(),
        generated_at,
        site: site::site_metadata(state.selected_shop(), phone),
        theme: Theme { root_css_variables },
        banners,
        categories,
        products,
    })
}

/// Extract and normalize in one step.
pub fn build_seed(html: &str, generated_at: DateTime<Utc>, opts: &NormalizeOptions) -> Result<SeedDocument> {
    let next_data = extract::extract_next_data(html)?;
    normalize(&next_data, html, generated_at, opts)
}

// ── Tests ──
