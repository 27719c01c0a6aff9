use psstore_core::ContentRating;
use serde_json::Value;

use crate::error::ScraperError;
use crate::graph::{Entry, PayloadGraph};

/// Reads the entity's `contentRating`. Both variants expose the same shape;
/// an entity whose rating is `null` has none.
pub(super) fn project(
    graph: &PayloadGraph,
    key: &str,
) -> Result<Option<ContentRating>, ScraperError> {
    let entity = graph.resolve(key)?;
    let Some(rating) = entity.opt_object_field("contentRating")? else {
        return Ok(None);
    };

    Ok(Some(ContentRating {
        name: rating.str("description")?.to_string(),
        image: rating.str("url")?.to_string(),
        interactive_elements: descriptions(&rating, "interactiveElements")?,
        descriptors: descriptions(&rating, "descriptors")?,
    }))
}

/// `[{description}, ...]`; an item without a description reads as `None`.
fn descriptions(rating: &Entry<'_>, field: &str) -> Result<Vec<Option<String>>, ScraperError> {
    Ok(rating
        .opt_array(field)?
        .unwrap_or_default()
        .iter()
        .map(|item| {
            item.get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .collect())
}
