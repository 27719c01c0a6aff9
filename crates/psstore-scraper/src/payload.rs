//! Locating and decoding the JSON payload a widget embeds in the page.
//!
//! Each widget ("microfrontend") on a product page renders a container
//! element carrying `data-mfe-name="<widget>"` and `data-initial="<id>"`,
//! where `<id>` names a `<script>` element whose text is the widget's
//! initial state:
//!
//! ```html
//! <div data-mfe-name="gameTitle" data-initial="env:abc123"></div>
//! <script id="env:abc123" type="application/json">{"args": {...}, "cache": {...}}</script>
//! ```
//!
//! Widgets are independent documents. Nothing here is cached between calls:
//! two widgets on the same page need not agree on key shapes.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ScraperError;

const WIDGET_NAME_ATTR: &str = "data-mfe-name";
const SCRIPT_ID_ATTR: &str = "data-initial";

static WIDGET_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-mfe-name]").expect("valid widget selector"));
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[id]").expect("valid script selector"));

/// The widgets the extractor reads, by their `data-mfe-name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    /// Hero artwork. Present on every product and concept page.
    BackgroundImage,
    Title,
    Price,
    ContentRating,
    /// Sibling editions.
    Upsell,
    AddOns,
    Info,
}

impl Widget {
    #[must_use]
    pub const fn mfe_name(self) -> &'static str {
        match self {
            Widget::BackgroundImage => "gameBackgroundImage",
            Widget::Title => "gameTitle",
            Widget::Price => "ctaWithPrice",
            Widget::ContentRating => "contentRating",
            Widget::Upsell => "upsell",
            Widget::AddOns => "addOns",
            Widget::Info => "gameInfo",
        }
    }
}

impl std::fmt::Display for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mfe_name())
    }
}

/// A decoded widget payload: the arguments the page was opened with and the
/// widget's normalized entity cache.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPayload {
    #[serde(default)]
    pub args: Map<String, Value>,
    #[serde(default)]
    pub cache: Map<String, Value>,
}

/// Parsed markup of one rendered storefront page.
#[derive(Debug)]
pub struct StorePage {
    document: Html,
}

impl StorePage {
    /// Parses rendered page markup. Parsing is lenient; malformed HTML never
    /// fails here, only later when a widget cannot be found.
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }

    /// Locates and decodes the payload for `widget`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::WidgetNotFound`] if no element carries the widget's name.
    /// - [`ScraperError::MissingScriptId`] if the container has no `data-initial`.
    /// - [`ScraperError::ScriptNotFound`] if no `<script>` has the referenced id.
    /// - [`ScraperError::Decode`] if the script body is not a JSON payload.
    pub fn locate(&self, widget: Widget) -> Result<RawPayload, ScraperError> {
        self.locate_by_name(widget.mfe_name())
    }

    /// Same as [`StorePage::locate`] for a widget name this crate has no
    /// [`Widget`] variant for.
    ///
    /// # Errors
    ///
    /// See [`StorePage::locate`].
    pub fn locate_by_name(&self, name: &str) -> Result<RawPayload, ScraperError> {
        let container = self
            .document
            .select(&WIDGET_SELECTOR)
            .find(|el| el.value().attr(WIDGET_NAME_ATTR) == Some(name))
            .ok_or_else(|| ScraperError::WidgetNotFound {
                widget: name.to_string(),
            })?;

        let script_id = container
            .value()
            .attr(SCRIPT_ID_ATTR)
            .ok_or_else(|| ScraperError::MissingScriptId {
                widget: name.to_string(),
            })?;

        let script = self
            .document
            .select(&SCRIPT_SELECTOR)
            .find(|el| el.value().id() == Some(script_id))
            .ok_or_else(|| ScraperError::ScriptNotFound {
                widget: name.to_string(),
                script_id: script_id.to_string(),
            })?;

        let text = script.text().collect::<String>();
        let payload = serde_json::from_str::<RawPayload>(&text).map_err(|source| {
            ScraperError::Decode {
                widget: name.to_string(),
                source,
            }
        })?;

        tracing::debug!(
            widget = name,
            script_id,
            entries = payload.cache.len(),
            "located widget payload"
        );
        Ok(payload)
    }
}
