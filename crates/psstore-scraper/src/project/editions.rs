use psstore_core::{EditionDetails, EditionItem};

use super::{genres, media_list, price_offers};
use crate::error::ScraperError;
use crate::graph::{Entry, PayloadGraph};

/// A product lists its siblings through its concept: product → `concept`
/// → `products`.
pub(super) fn project_product(
    graph: &PayloadGraph,
    key: &str,
) -> Result<Option<Vec<EditionItem>>, ScraperError> {
    let product = graph.resolve(key)?;
    match product.follow("concept")? {
        Some(concept) => sibling_editions(&concept),
        None => Ok(None),
    }
}

pub(super) fn project_concept(
    graph: &PayloadGraph,
    key: &str,
) -> Result<Option<Vec<EditionItem>>, ScraperError> {
    sibling_editions(&graph.resolve(key)?)
}

fn sibling_editions(concept: &Entry<'_>) -> Result<Option<Vec<EditionItem>>, ScraperError> {
    if concept.opt_array("products")?.is_none() {
        return Ok(None);
    }
    concept
        .follow_list("products")?
        .iter()
        .map(edition_item)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn edition_item(product: &Entry<'_>) -> Result<EditionItem, ScraperError> {
    let edition = match product.opt_object_field("edition")? {
        Some(edition) => Some(EditionDetails {
            name: edition.opt_str("name")?.map(str::to_string),
            features: edition.opt_str_list("features")?.unwrap_or_default(),
            edition_type: edition.opt_str("type")?.map(str::to_string),
        }),
        None => None,
    };

    let content_rating = match product.opt_object_field("contentRating")? {
        Some(rating) => rating.opt_str("name")?.map(str::to_string),
        None => None,
    };

    Ok(EditionItem {
        id: product.str("id")?.to_string(),
        category: product.opt_str("topCategory")?.map(str::to_string),
        platforms: product.str_list("platforms")?,
        image: media_list(product, "media")?,
        edition,
        content_rating,
        genres: genres(product)?,
        name: product.str("name")?.to_string(),
        price: price_offers(product)?,
    })
}
