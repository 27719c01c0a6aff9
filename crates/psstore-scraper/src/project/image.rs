use psstore_core::MediaImage;

use super::media_list;
use crate::error::ScraperError;
use crate::graph::PayloadGraph;

/// Hero media for either identity variant: products and concepts both carry
/// a `media` list.
pub(super) fn project(graph: &PayloadGraph, key: &str) -> Result<Vec<MediaImage>, ScraperError> {
    media_list(&graph.resolve(key)?, "media")
}
