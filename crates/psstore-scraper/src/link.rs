//! Validation of storefront page links.
//!
//! Accepted shapes are `<origin>/<ll>-<cc>/product/<id>` and
//! `<origin>/<ll>-<cc>/concept/<id>`, optionally followed by a trailing
//! slash, query or fragment.

use std::sync::LazyLock;

use psstore_core::IdentityKind;
use regex::Regex;

use crate::error::ScraperError;

static PAGE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?P<locale>\w{2}-\w{2})/(?P<kind>concept|product)/(?P<id>[^/?#]+)/?(?:[?#].*)?$")
        .expect("valid page path pattern")
});

/// A link that points at one product or concept page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLink {
    pub kind: IdentityKind,
    /// Language-region segment, e.g. `en-us`.
    pub locale: String,
    /// The product or concept id as it appears in the path.
    pub id: String,
    /// The link as given.
    pub url: String,
}

impl StoreLink {
    /// Parses `href` against `origin` (e.g. `https://store.playstation.com`).
    ///
    /// # Errors
    ///
    /// [`ScraperError::InvalidLink`] when `href` is not on `origin` or its
    /// path is neither a product nor a concept page.
    pub fn parse(href: &str, origin: &str) -> Result<Self, ScraperError> {
        let invalid = || ScraperError::InvalidLink {
            href: href.to_string(),
        };

        let path = href
            .strip_prefix(origin.trim_end_matches('/'))
            .ok_or_else(invalid)?;
        let caps = PAGE_PATH.captures(path).ok_or_else(invalid)?;

        let kind = match &caps["kind"] {
            "product" => IdentityKind::Product,
            _ => IdentityKind::Concept,
        };

        Ok(Self {
            kind,
            locale: caps["locale"].to_string(),
            id: caps["id"].to_string(),
            url: href.to_string(),
        })
    }
}
