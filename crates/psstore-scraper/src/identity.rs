//! Deciding whether a page is addressed as a product or as a concept.
//!
//! The background-image widget is on every page, so its payload is the one
//! consulted. A page opened by product id is that product. A page opened by
//! concept id is treated as the concept's default product when the concept
//! has one, and as the bare concept otherwise (multi-edition titles and
//! titles that are only announced).

use psstore_core::ProductIdentity;
use serde_json::Value;

use crate::error::ScraperError;
use crate::graph::PayloadGraph;

/// Resolves the page identity from the background-image widget's payload.
///
/// # Errors
///
/// - [`ScraperError::InvalidIdentity`] when the payload arguments carry
///   neither `productId` nor `conceptId`, or the concept entry is missing.
/// - [`ScraperError::MissingField`] when `defaultProduct` is present but is
///   not a reference.
pub fn resolve_identity(graph: &PayloadGraph) -> Result<ProductIdentity, ScraperError> {
    if let Some(product_id) = arg_id(graph, "productId") {
        let identity = ProductIdentity::product_from_id(&product_id);
        tracing::debug!(%identity, "page addressed by product id");
        return Ok(identity);
    }

    let concept_id = arg_id(graph, "conceptId").ok_or_else(|| ScraperError::InvalidIdentity {
        reason: "page arguments carry neither productId nor conceptId".to_string(),
    })?;

    let concept_identity = ProductIdentity::concept_from_id(&concept_id);
    let concept = graph.resolve(concept_identity.key()).map_err(|_| {
        ScraperError::InvalidIdentity {
            reason: format!("concept entry {:?} is missing", concept_identity.key()),
        }
    })?;

    let identity = match concept.ref_field("defaultProduct")? {
        Some(product_key) => ProductIdentity::Product(product_key.to_string()),
        None => concept_identity,
    };
    tracing::debug!(%identity, concept_id = %concept_id, "page addressed by concept id");
    Ok(identity)
}

/// An id argument as a string. The storefront emits ids as strings but
/// numeric concept ids are accepted too.
fn arg_id(graph: &PayloadGraph, name: &str) -> Option<String> {
    match graph.args().get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
