use psstore_core::Price;

use super::price_offers;
use crate::error::ScraperError;
use crate::graph::PayloadGraph;

pub(super) fn project_product(graph: &PayloadGraph, key: &str) -> Result<Price, ScraperError> {
    price_offers(&graph.resolve(key)?).map(Price::Offers)
}

/// Concepts have no offers of their own, only whether they are announced.
pub(super) fn project_concept(graph: &PayloadGraph, key: &str) -> Result<Price, ScraperError> {
    let concept = graph.resolve(key)?;
    Ok(Price::Announcement {
        is_announce: concept.bool("isAnnounce")?,
    })
}
