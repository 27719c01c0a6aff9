//! Projection of widget payloads into the `Game` sub-records.
//!
//! Every aspect is a [`Projector`]: the widget it reads plus one function per
//! identity variant. The variant is picked from the table by the identity's
//! tag, so no projection function branches on product vs concept itself.
//! Each call locates its own widget payload.

mod addons;
mod content_rating;
mod editions;
mod image;
mod info;
mod price;
mod title;

use psstore_core::{
    Addon, ContentRating, EditionItem, IdentityKind, Info, MediaImage, Price, PriceOffer,
    ProductIdentity, Title,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ScraperError;
use crate::graph::{Entry, PayloadGraph};
use crate::payload::{StorePage, Widget};

/// GraphQL type discriminator the storefront leaves on embedded objects.
pub(crate) const TYPENAME_FIELD: &str = "__typename";

/// A projection function: the widget's graph and the identity's cache key in,
/// one sub-record out.
pub type ProjectFn<T> = fn(&PayloadGraph, &str) -> Result<T, ScraperError>;

/// One aspect of the `Game` record: where it lives and how to read it for
/// each identity variant.
pub struct Projector<T> {
    widget: Widget,
    product: ProjectFn<T>,
    concept: ProjectFn<T>,
}

impl<T> Projector<T> {
    pub const fn new(widget: Widget, product: ProjectFn<T>, concept: ProjectFn<T>) -> Self {
        Self {
            widget,
            product,
            concept,
        }
    }

    #[must_use]
    pub const fn widget(&self) -> Widget {
        self.widget
    }

    fn select(&self, kind: IdentityKind) -> ProjectFn<T> {
        match kind {
            IdentityKind::Product => self.product,
            IdentityKind::Concept => self.concept,
        }
    }

    /// Projects an aspect the page must carry.
    ///
    /// # Errors
    ///
    /// Any locate, reference or field error is returned as is.
    pub fn project(
        &self,
        page: &StorePage,
        identity: &ProductIdentity,
    ) -> Result<T, ScraperError> {
        let graph = PayloadGraph::new(page.locate(self.widget)?);
        (self.select(identity.kind()))(&graph, identity.key())
    }

    /// Projects an aspect that may be missing from the page. A widget that
    /// cannot be located or decoded yields `Ok(None)`; a located widget with
    /// the wrong shape is still an error.
    ///
    /// # Errors
    ///
    /// Reference and field errors from a located widget.
    pub fn project_optional(
        &self,
        page: &StorePage,
        identity: &ProductIdentity,
    ) -> Result<Option<T>, ScraperError> {
        match page.locate(self.widget) {
            Ok(payload) => {
                let graph = PayloadGraph::new(payload);
                (self.select(identity.kind()))(&graph, identity.key()).map(Some)
            }
            Err(err) if err.is_locate_failure() => {
                tracing::warn!(widget = %self.widget, error = %err, "optional widget absent");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

pub const IMAGE: Projector<Vec<MediaImage>> =
    Projector::new(Widget::BackgroundImage, image::project, image::project);

pub const TITLE: Projector<Title> =
    Projector::new(Widget::Title, title::project_product, title::project_concept);

pub const PRICE: Projector<Price> =
    Projector::new(Widget::Price, price::project_product, price::project_concept);

/// `None` inside when the widget is present but carries no rating.
pub const CONTENT_RATING: Projector<Option<ContentRating>> = Projector::new(
    Widget::ContentRating,
    content_rating::project,
    content_rating::project,
);

/// `None` inside when the concept has no product list.
pub const EDITIONS: Projector<Option<Vec<EditionItem>>> = Projector::new(
    Widget::Upsell,
    editions::project_product,
    editions::project_concept,
);

pub const ADDONS: Projector<Vec<Addon>> =
    Projector::new(Widget::AddOns, addons::project, addons::project);

pub const INFO: Projector<Info> =
    Projector::new(Widget::Info, info::project_product, info::project_concept);

// ---------------------------------------------------------------------------
// Shared field readers
// ---------------------------------------------------------------------------

/// Reads a `[{role, url}, ...]` media list.
fn media_list(entry: &Entry<'_>, field: &str) -> Result<Vec<MediaImage>, ScraperError> {
    entry
        .array(field)?
        .iter()
        .map(|item| {
            let role = item.get("role").and_then(Value::as_str);
            let url = item.get("url").and_then(Value::as_str);
            match (role, url) {
                (Some(role), Some(url)) => Ok(MediaImage {
                    role: role.to_string(),
                    url: url.to_string(),
                }),
                _ => Err(ScraperError::MissingField {
                    entry: entry.key().to_string(),
                    field: field.to_string(),
                    expected: "media items with role and url",
                }),
            }
        })
        .collect()
}

/// Reads `localizedGenres: [{value}, ...]`; `null`, absent and empty all
/// read as `None`.
fn genres(entry: &Entry<'_>) -> Result<Option<Vec<String>>, ScraperError> {
    let Some(items) = entry.opt_array("localizedGenres")? else {
        return Ok(None);
    };
    if items.is_empty() {
        return Ok(None);
    }
    items
        .iter()
        .map(|item| {
            item.get("value")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ScraperError::MissingField {
                    entry: entry.key().to_string(),
                    field: "localizedGenres".to_string(),
                    expected: "genre objects with a value",
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Copies an embedded object without its `__typename` discriminator and
/// deserializes it into `T`.
fn strip_typename<T: DeserializeOwned>(entry: &Entry<'_>, context: &str) -> Result<T, ScraperError> {
    let mut object: Map<String, Value> = entry.object().clone();
    object.remove(TYPENAME_FIELD);
    serde_json::from_value(Value::Object(object)).map_err(|source| ScraperError::Deserialize {
        context: format!("{context} of {}", entry.key()),
        source,
    })
}

/// Resolves a product's `webctas` and reads each call-to-action's offer type
/// and price detail.
fn price_offers(product: &Entry<'_>) -> Result<Vec<PriceOffer>, ScraperError> {
    product
        .follow_list("webctas")?
        .iter()
        .map(|cta| {
            Ok(PriceOffer {
                offer_type: cta.str("type")?.to_string(),
                info: strip_typename(&cta.object_field("price")?, "price")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::payload::RawPayload;

    fn graph(cache: Value) -> PayloadGraph {
        PayloadGraph::new(
            serde_json::from_value::<RawPayload>(json!({"args": {}, "cache": cache})).unwrap(),
        )
    }

    fn page_with(widget: &str, payload: &Value) -> StorePage {
        StorePage::parse(&format!(
            r#"<div data-mfe-name="{widget}" data-initial="s"></div><script id="s">{payload}</script>"#
        ))
    }

    #[test]
    fn genres_empty_list_reads_as_none() {
        let g = graph(json!({"Product:A": {"localizedGenres": []}}));
        assert_eq!(genres(&g.resolve("Product:A").unwrap()).unwrap(), None);
    }

    #[test]
    fn genres_reads_values_in_order() {
        let g = graph(json!({"Product:A": {"localizedGenres": [
            {"__typename": "LocalizedGenre", "value": "Action"},
            {"__typename": "LocalizedGenre", "value": "Adventure"}
        ]}}));
        assert_eq!(
            genres(&g.resolve("Product:A").unwrap()).unwrap(),
            Some(vec!["Action".to_string(), "Adventure".to_string()])
        );
    }

    #[test]
    fn media_item_without_url_is_an_error() {
        let g = graph(json!({"Product:A": {"media": [{"role": "MASTER"}]}}));
        assert!(media_list(&g.resolve("Product:A").unwrap(), "media").is_err());
    }

    #[test]
    fn optional_projection_of_missing_widget_is_none() {
        let page = StorePage::parse("<html></html>");
        let identity = ProductIdentity::product_from_id("A");
        assert_eq!(ADDONS.project_optional(&page, &identity).unwrap(), None);
    }

    #[test]
    fn optional_projection_of_malformed_widget_is_an_error() {
        let page = page_with("addOns", &json!({"args": {}, "cache": {}}));
        let identity = ProductIdentity::product_from_id("A");
        let err = ADDONS.project_optional(&page, &identity).unwrap_err();
        assert!(matches!(err, ScraperError::MissingReference { .. }), "got {err:?}");
    }

    #[test]
    fn mandatory_projection_of_missing_widget_is_widget_not_found() {
        let page = StorePage::parse("<html></html>");
        let identity = ProductIdentity::product_from_id("A");
        let err = TITLE.project(&page, &identity).unwrap_err();
        assert!(
            matches!(err, ScraperError::WidgetNotFound { ref widget } if widget == "gameTitle"),
            "got {err:?}"
        );
    }

    #[test]
    fn table_dispatches_on_identity_kind() {
        let payload = json!({"args": {}, "cache": {
            "Concept:C": {"isAnnounce": true},
            "Product:P": {"webctas": []}
        }});
        let page = page_with("ctaWithPrice", &payload);

        let concept = PRICE
            .project(&page, &ProductIdentity::concept_from_id("C"))
            .unwrap();
        assert_eq!(concept, Price::Announcement { is_announce: true });

        let product = PRICE
            .project(&page, &ProductIdentity::product_from_id("P"))
            .unwrap();
        assert_eq!(product, Price::Offers(vec![]));
    }
}
