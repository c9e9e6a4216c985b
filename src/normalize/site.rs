use serde_json::Value;

use super::coerce::{self, Record};
use crate::model::{Address, Banner, SiteMetadata, WorkingHours};

pub const SITE_TITLE: &str = "Доставка роллов и суши — King Kong Sushi (Кинг Конг Суши)";
pub const BRAND: &str = "King Kong Sushi";
pub const CITY: &str = "Краснодар";
pub const PHONE: &str = "+7 (800) 200-65-59";
pub const STREET: &str = "Бабушкина";
pub const HOUSE: &str = "252";
pub const CURRENCY: &str = "RUB";
pub const CURRENCY_SYMBOL: &str = "₽";
pub const ORDER_METHODS: &[&str] = &["pickup", "delivery"];

const OPENS: (i64, i64) = (11, 0);
const CLOSES: (i64, i64) = (22, 45);

const BANNER_CODE: &str = "banner";
const BANNER_TEXT_COLOR: &str = "#1c1c1c";

/// Site record for the selected shop. `phone` comes from the page markup, not the shop.
pub fn site_metadata(shop: Option<&Record>, phone: Option<String>) -> SiteMetadata {
    let address = shop.and_then(|s| s.get("address"));
    let address_text = |key: &str, default: &str| {
        Some(coerce::text(address.and_then(|a| a.get(key))))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    };
    let hours = shop.and_then(|s| s.get("workingHours"));

    SiteMetadata {
        title: SITE_TITLE.to_string(),
        brand: BRAND.to_string(),
        city: address_text("city", CITY),
        phone: phone.unwrap_or_else(|| PHONE.to_string()),
        address: Address {
            street: address_text("street", STREET),
            house: address_text("house", HOUSE),
        },
        working_hours: WorkingHours {
            from: clock(hours, ("fromHour", "fromMinutes"), OPENS),
            to: clock(hours, ("toHour", "toMinutes"), CLOSES),
        },
        order_methods: ORDER_METHODS.iter().map(|m| m.to_string()).collect(),
        currency: CURRENCY.to_string(),
        currency_symbol: CURRENCY_SYMBOL.to_string(),
    }
}

/// `HH:MM` from an hour/minute pair; each half falls back independently.
/// Zero is a real value here (midnight, on the hour), unlike the product
/// measurements where zero means "not provided".
fn clock(hours: Option<&Value>, (hour_key, minute_key): (&str, &str), default: (i64, i64)) -> String {
    let part = |key: &str| coerce::int(hours.and_then(|h| h.get(key)));
    let hour = part(hour_key).unwrap_or(default.0);
    let minute = part(minute_key).unwrap_or(default.1);
    format!("{:02}:{:02}", hour, minute)
}

pub fn banners(items: &[&Record]) -> Vec<Banner> {
    items
        .iter()
        .map(|b| {
            let title = coerce::text(b.get("title"));
            let code = [coerce::text(b.get("urlCode")), title.clone()]
                .into_iter()
                .find(|c| !c.is_empty())
                .unwrap_or_else(|| BANNER_CODE.to_string());

            Banner {
                id: coerce::text(b.get("id")),
                code,
                title,
                image: ["verticalBackgroundImage", "backgroundImage", "image"]
                    .iter()
                    .find_map(|key| coerce::url(b.get(*key))),
                text_color: coerce::url(b.get("colorText"))
                    .unwrap_or_else(|| BANNER_TEXT_COLOR.to_string()),
            }
        })
        .collect()
}
