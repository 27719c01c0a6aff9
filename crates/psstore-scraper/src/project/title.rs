use psstore_core::{RatingCount, StarRating, Title, TitleProductDetails};
use serde_json::Value;

use crate::error::ScraperError;
use crate::graph::{Entry, PayloadGraph};

pub(super) fn project_product(graph: &PayloadGraph, key: &str) -> Result<Title, ScraperError> {
    let product = graph.resolve(key)?;

    let edition = match product.opt_object_field("edition")? {
        Some(edition) => edition.opt_str("name")?.map(str::to_string),
        None => None,
    };

    Ok(Title {
        name: product.str("name")?.to_string(),
        publisher: product.opt_str("publisherName")?.map(str::to_string),
        release: product.opt_str("releaseDate")?.map(str::to_string),
        product: Some(TitleProductDetails {
            edition,
            platforms: product.str_list("platforms")?,
            star_rating: star_rating(&product)?,
            category: product.opt_str("topCategory")?.map(str::to_string),
        }),
    })
}

pub(super) fn project_concept(graph: &PayloadGraph, key: &str) -> Result<Title, ScraperError> {
    let concept = graph.resolve(key)?;

    Ok(Title {
        name: concept.str("name")?.to_string(),
        publisher: concept.opt_str("publisherName")?.map(str::to_string),
        release: concept_release(&concept)?,
        product: None,
    })
}

/// Concepts wrap their release date as `{"value": "...", "type": "DAY_MONTH_YEAR"}`.
pub(super) fn concept_release(concept: &Entry<'_>) -> Result<Option<String>, ScraperError> {
    match concept.opt_object_field("releaseDate")? {
        Some(release) => Ok(release.opt_str("value")?.map(str::to_string)),
        None => Ok(None),
    }
}

/// `starRating: {averageRating, totalRatingsCount}`; a `null` rating reads
/// as an empty pair.
fn star_rating(product: &Entry<'_>) -> Result<StarRating, ScraperError> {
    let Some(rating) = product.opt_object_field("starRating")? else {
        return Ok(StarRating {
            rating: None,
            count: None,
        });
    };

    let count = match rating.get("totalRatingsCount") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(
            n.as_u64()
                .map_or_else(|| RatingCount::Text(n.to_string()), RatingCount::Count),
        ),
        Some(Value::String(s)) => Some(RatingCount::Text(s.clone())),
        Some(_) => {
            return Err(ScraperError::MissingField {
                entry: product.key().to_string(),
                field: "starRating.totalRatingsCount".to_string(),
                expected: "number or string",
            })
        }
    };

    Ok(StarRating {
        rating: rating.get("averageRating").and_then(Value::as_f64),
        count,
    })
}
