use psstore_core::Addon;
use serde_json::Value;

use super::{genres, strip_typename};
use crate::error::ScraperError;
use crate::graph::{Entry, PayloadGraph};

const ADDON_LIST_FIELD: &str = "addOnProducts";

/// Add-ons hang off a page-scoped query field on `ROOT_QUERY` whose name
/// carries the page's arguments, so the identity key is not used.
pub(super) fn project(graph: &PayloadGraph, _key: &str) -> Result<Vec<Addon>, ScraperError> {
    let root = graph.root()?;
    let references = addon_references(&root)?;
    graph
        .resolve_list(references)?
        .iter()
        .map(addon)
        .collect()
}

/// The latest root field holding an `addOnProducts` list. Fields are walked
/// newest first in document order.
fn addon_references<'a>(root: &Entry<'a>) -> Result<&'a [Value], ScraperError> {
    root.object()
        .values()
        .rev()
        .find_map(|value| value.get(ADDON_LIST_FIELD).and_then(Value::as_array))
        .map(Vec::as_slice)
        .ok_or_else(|| ScraperError::MissingField {
            entry: root.key().to_string(),
            field: ADDON_LIST_FIELD.to_string(),
            expected: "root query field with an add-on list",
        })
}

fn addon(entry: &Entry<'_>) -> Result<Addon, ScraperError> {
    let price = match entry.opt_object_field("price")? {
        Some(price) => Some(strip_typename(&price, "add-on price")?),
        None => None,
    };

    Ok(Addon {
        id: entry.str("id")?.to_string(),
        image: entry.object_field("boxArt")?.str("url")?.to_string(),
        genres: genres(entry)?,
        classification: entry
            .opt_str("localizedStoreDisplayClassification")?
            .map(str::to_string),
        name: entry.str("name")?.to_string(),
        platforms: entry.str_list("platforms")?,
        addon_type: entry.opt_str("type")?.map(str::to_string),
        price,
    })
}
