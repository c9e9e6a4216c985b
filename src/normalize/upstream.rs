use serde_json::{Map, Value};

use super::coerce::{self, Record};
use crate::error::{Result, SeedError};

const STATE_PATH: &[&str] = &["props", "pageProps", "initialState"];

/// The parts of the upstream page state the normalizer reads.
///
/// Everything that depends on the upstream's internal layout lives here, so a
/// change on their side shows up as one `MalformedData` error naming the hop.
#[derive(Debug)]
pub struct UpstreamState<'a> {
    pub categories: Vec<&'a Record>,
    pub meals: Vec<&'a Record>,
    pub banners: Vec<&'a Record>,
    pub shops: Vec<&'a Record>,
    pub current_shop: Option<&'a Value>,
}

impl<'a> UpstreamState<'a> {
    pub fn project(next_data: &'a Value) -> Result<Self> {
        let state = object_at(next_data, STATE_PATH)?;
        let shops = object_at(state, &["shops"])?;

        Ok(UpstreamState {
            categories: records_at(state, &["category", "_items"])?,
            meals: records_at(state, &["meals", "_list", "items"])?,
            banners: records_at(state, &["banners", "_data"])?,
            shops: coerce::records(shops.get("_list")).collect(),
            current_shop: shops.get("_current").filter(|v| !v.is_null()),
        })
    }

    /// Shop matching `_current`, else the first one, else `None`.
    pub fn selected_shop(&self) -> Option<&'a Record> {
        self.current_shop
            .and_then(|id| self.shops.iter().find(|s| s.get("id") == Some(id)))
            .or_else(|| self.shops.first())
            .copied()
    }
}

fn hop<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value> {
    path.iter().enumerate().try_fold(root, |node, (depth, key)| {
        node.get(*key).ok_or_else(|| {
            SeedError::MalformedData(format!(
                "upstream state has no `{}`",
                path[..=depth].join(".")
            ))
        })
    })
}

fn object_at<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let node = hop(root, path)?;
    match node {
        Value::Object(_) => Ok(node),
        other => Err(wrong_type(path, "an object", other)),
    }
}

fn records_at<'a>(root: &'a Value, path: &[&str]) -> Result<Vec<&'a Map<String, Value>>> {
    match hop(root, path)? {
        Value::Array(items) => Ok(items.iter().filter_map(Value::as_object).collect()),
        other => Err(wrong_type(path, "an array", other)),
    }
}

fn wrong_type(path: &[&str], expected: &str, found: &Value) -> SeedError {
    let kind = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    SeedError::MalformedData(format!(
        "upstream `{}` is {}, expected {}",
        path.join("."),
        kind,
        expected
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(state: Value) -> Value {
        json!({ "props": { "pageProps": { "initialState": state } } })
    }

    fn minimal_state() -> Value {
        json!({
            "category": { "_items": [] },
            "meals": { "_list": { "items": [] } },
            "banners": { "_data": [] },
            "shops": {}
        })
    }

    #[test]
    fn projects_minimal_state() {
        let data = wrap(minimal_state());
        let up = UpstreamState::project(&data).unwrap();
        assert!(up.categories.is_empty());
        assert!(up.shops.is_empty());
        assert!(up.current_shop.is_none());
        assert!(up.selected_shop().is_none());
    }

    #[test]
    fn missing_hop_names_the_path() {
        let mut state = minimal_state();
        state["meals"] = json!({ "_list": {} });
        let data = wrap(state);
        match UpstreamState::project(&data).unwrap_err() {
            SeedError::MalformedData(msg) => assert!(msg.contains("meals._list.items"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wrong_type_is_malformed() {
        let mut state = minimal_state();
        state["banners"]["_data"] = json!("nope");
        let data = wrap(state);
        match UpstreamState::project(&data).unwrap_err() {
            SeedError::MalformedData(msg) => {
                assert!(msg.contains("banners._data"));
                assert!(msg.contains("a string"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_page_props_is_malformed() {
        let data = json!({ "props": {} });
        assert!(matches!(
            UpstreamState::project(&data),
            Err(SeedError::MalformedData(_))
        ));
    }

    #[test]
    fn non_record_entries_dropped() {
        let mut state = minimal_state();
        state["category"]["_items"] = json!([{ "code": "a" }, 5, null, { "code": "b" }]);
        let data = wrap(state);
        let up = UpstreamState::project(&data).unwrap();
        assert_eq!(up.categories.len(), 2);
    }

    #[test]
    fn shop_selection() {
        let mut state = minimal_state();
        state["shops"] = json!({
            "_current": 2,
            "_list": [{ "id": 1, "name": "first" }, { "id": 2, "name": "second" }]
        });
        let data = wrap(state.clone());
        let up = UpstreamState::project(&data).unwrap();
        assert_eq!(up.selected_shop().unwrap()["name"], "second");

        state["shops"]["_current"] = json!(99);
        let data = wrap(state.clone());
        let up = UpstreamState::project(&data).unwrap();
        assert_eq!(up.selected_shop().unwrap()["name"], "first");

        state["shops"]["_current"] = Value::Null;
        let data = wrap(state);
        let up = UpstreamState::project(&data).unwrap();
        assert_eq!(up.selected_shop().unwrap()["name"], "first");
    }
}
