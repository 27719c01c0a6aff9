//! Building one `Game` record from one rendered page.
//!
//! [`GameAssembler`] moves through two states. `Unresolved` knows only the
//! page and an optional caller-supplied id; [`GameAssembler::load`] resolves
//! the page identity and yields `Resolved`, whose
//! [`GameAssembler::assemble`] runs every projector. Nothing is visible to
//! callers until the whole record is built.

use chrono::Utc;
use psstore_core::{Game, ProductIdentity};

use crate::error::{PageError, ScraperError};
use crate::graph::PayloadGraph;
use crate::identity::resolve_identity;
use crate::payload::{StorePage, Widget};
use crate::project;

/// Page parsed, identity not yet known.
#[derive(Debug)]
pub struct Unresolved {
    external_id: Option<String>,
}

/// Identity known; ready to project.
#[derive(Debug)]
pub struct Resolved {
    id: String,
    identity: ProductIdentity,
}

#[derive(Debug)]
pub struct GameAssembler<'p, S> {
    page: &'p StorePage,
    state: S,
}

impl<'p> GameAssembler<'p, Unresolved> {
    #[must_use]
    pub fn new(page: &'p StorePage, external_id: Option<String>) -> Self {
        Self {
            page,
            state: Unresolved { external_id },
        }
    }

    /// Resolves the page identity from the background-image widget.
    ///
    /// The record id is the caller-supplied id when given, otherwise the
    /// resolved key without its `Product:`/`Concept:` prefix.
    ///
    /// # Errors
    ///
    /// - Locate errors for the background-image widget, which every page has.
    /// - [`ScraperError::InvalidIdentity`] when no identity or no id can be
    ///   derived.
    pub fn load(self) -> Result<GameAssembler<'p, Resolved>, ScraperError> {
        let graph = PayloadGraph::new(self.page.locate(Widget::BackgroundImage)?);
        let identity = resolve_identity(&graph)?;

        let id = match self.state.external_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => identity.id().to_string(),
        };
        if id.is_empty() {
            return Err(ScraperError::InvalidIdentity {
                reason: format!("identity key {:?} carries no id", identity.key()),
            });
        }

        tracing::debug!(%identity, id = %id, "page identity resolved");
        Ok(GameAssembler {
            page: self.page,
            state: Resolved { id, identity },
        })
    }
}

impl GameAssembler<'_, Resolved> {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.state.id
    }

    #[must_use]
    pub fn identity(&self) -> &ProductIdentity {
        &self.state.identity
    }

    /// Runs every projector and stamps the record with the current time.
    ///
    /// # Errors
    ///
    /// The first error from a mandatory aspect, or a shape error from a
    /// present optional widget.
    pub fn assemble(self) -> Result<Game, ScraperError> {
        let page = self.page;
        let identity = &self.state.identity;

        let image = project::IMAGE.project(page, identity)?;
        let title = project::TITLE.project(page, identity)?;
        let price = project::PRICE.project(page, identity)?;
        let content_rating = project::CONTENT_RATING
            .project_optional(page, identity)?
            .flatten();
        let editions = project::EDITIONS
            .project_optional(page, identity)?
            .flatten();
        let addons = project::ADDONS.project_optional(page, identity)?;
        let info = project::INFO.project(page, identity)?;

        Ok(Game {
            id: self.state.id,
            product_id: self.state.identity,
            image,
            title,
            price,
            content_rating,
            editions,
            addons,
            info,
            info_date: Utc::now(),
        })
    }
}

/// Extracts one `Game` from rendered markup. Any failure is tagged with
/// `page`, which names the page in logs and errors (an href or file path).
///
/// # Errors
///
/// Returns [`PageError`] wrapping the first error hit; no partial record is
/// produced.
pub fn extract_game(
    page: &str,
    markup: &str,
    external_id: Option<&str>,
) -> Result<Game, PageError> {
    let document = StorePage::parse(markup);
    GameAssembler::new(&document, external_id.map(str::to_string))
        .load()
        .and_then(|resolved| resolved.assemble())
        .map_err(|source| PageError::new(page, source))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn widget(name: &str, payload: &Value) -> String {
        format!(
            r#"<div data-mfe-name="{name}" data-initial="s-{name}"></div><script id="s-{name}" type="application/json">{payload}</script>"#
        )
    }

    #[test]
    fn load_prefers_external_id() {
        let markup = widget(
            "gameBackgroundImage",
            &json!({"args": {"productId": "P1"}, "cache": {}}),
        );
        let page = StorePage::parse(&markup);

        let resolved = GameAssembler::new(&page, Some("custom".to_string()))
            .load()
            .unwrap();
        assert_eq!(resolved.id(), "custom");
        assert_eq!(resolved.identity().key(), "Product:P1");

        let derived = GameAssembler::new(&page, None).load().unwrap();
        assert_eq!(derived.id(), "P1");
    }

    #[test]
    fn load_without_background_widget_is_widget_not_found() {
        let page = StorePage::parse("<html><body></body></html>");
        let err = GameAssembler::new(&page, None).load().unwrap_err();
        assert!(
            matches!(err, ScraperError::WidgetNotFound { ref widget } if widget == "gameBackgroundImage"),
            "got {err:?}"
        );
    }

    #[test]
    fn extract_game_tags_failures_with_page() {
        let err = extract_game("saved.html", "<html></html>", None).unwrap_err();
        assert_eq!(err.page, "saved.html");
        assert!(matches!(err.source, ScraperError::WidgetNotFound { .. }));
    }
}
