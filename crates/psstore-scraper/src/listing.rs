//! Game links from a rendered browse/listing page.
//!
//! Listing pages render each game as an anchor inside the main grid:
//!
//! ```html
//! <a href="/en-us/concept/10001234" data-telemetry-meta='{"id":"10001234","index":0,"name":"Example"}'>
//!   <img data-qa="ems-sdk-grid#productTile0#game-art#image#image" src="https://image.api/x.png?w=54">
//! </a>
//! ```
//!
//! A page with no tiles is past the last page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

const TELEMETRY_ATTR: &str = "data-telemetry-meta";

static TILE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[id="__next"] > main[id="main"] ul li a"#).expect("valid tile selector")
});
static ART_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[data-qa]").expect("valid art selector"));

/// One game tile on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLink {
    pub id: String,
    pub name: String,
    /// Absolute page URL.
    pub url: String,
    /// Tile art without its sizing query.
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelemetryMeta {
    id: String,
    name: String,
    index: u64,
}

/// The URL of listing page `page` (1-based) under `base`, e.g.
/// `https://store.playstation.com/en-us/pages/browse` → `.../browse/3`.
#[must_use]
pub fn listing_page_url(base: &str, page: u32) -> String {
    format!("{}/{page}", base.trim_end_matches('/'))
}

/// Extracts every game tile from a listing page. Anchors without telemetry
/// metadata are not game tiles and are skipped.
///
/// # Errors
///
/// [`ScraperError::Deserialize`] when a tile's telemetry metadata is not the
/// expected JSON.
pub fn parse_listing_page(markup: &str, origin: &str) -> Result<Vec<GameLink>, ScraperError> {
    let document = Html::parse_document(markup);
    let origin = origin.trim_end_matches('/');

    let mut links = Vec::new();
    for anchor in document.select(&TILE_SELECTOR) {
        let Some(raw_meta) = anchor.value().attr(TELEMETRY_ATTR) else {
            continue;
        };
        let meta: TelemetryMeta =
            serde_json::from_str(raw_meta).map_err(|source| ScraperError::Deserialize {
                context: format!("{TELEMETRY_ATTR} of tile {raw_meta:?}"),
                source,
            })?;

        let href = anchor.value().attr("href").unwrap_or_default();
        let url = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{origin}{href}")
        };

        links.push(GameLink {
            image: tile_art(anchor, meta.index),
            id: meta.id,
            name: meta.name,
            url,
        });
    }

    tracing::debug!(tiles = links.len(), "parsed listing page");
    Ok(links)
}

fn tile_art(anchor: ElementRef<'_>, index: u64) -> Option<String> {
    let suffix = format!("#productTile{index}#game-art#image#image");
    anchor
        .select(&ART_SELECTOR)
        .find(|img| {
            img.value()
                .attr("data-qa")
                .is_some_and(|qa| qa.ends_with(&suffix))
        })
        .and_then(|img| img.value().attr("src"))
        .map(|src| src.split_once('?').map_or(src, |(bare, _)| bare).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://store.playstation.com";

    fn listing(tiles: &str) -> String {
        format!(r#"<html><body><div id="__next"><main id="main"><ul>{tiles}</ul></main></div></body></html>"#)
    }

    fn tile(index: u32, id: &str) -> String {
        format!(
            r#"<li><a href="/en-us/concept/{id}" data-telemetry-meta='{{"id":"{id}","index":{index},"name":"Game {id}"}}'>
                <img data-qa="ems-sdk-grid#productTile{index}#game-art#image#no-js" src="https://img/{id}-nojs.png">
                <img data-qa="ems-sdk-grid#productTile{index}#game-art#image#image" src="https://img/{id}.png?w=54&amp;thumb=true">
            </a></li>"#
        )
    }

    #[test]
    fn extracts_tiles_in_order() {
        let markup = listing(&format!("{}{}", tile(0, "100"), tile(1, "200")));
        let links = parse_listing_page(&markup, ORIGIN).unwrap();
        assert_eq!(
            links,
            vec![
                GameLink {
                    id: "100".to_string(),
                    name: "Game 100".to_string(),
                    url: "https://store.playstation.com/en-us/concept/100".to_string(),
                    image: Some("https://img/100.png".to_string()),
                },
                GameLink {
                    id: "200".to_string(),
                    name: "Game 200".to_string(),
                    url: "https://store.playstation.com/en-us/concept/200".to_string(),
                    image: Some("https://img/200.png".to_string()),
                },
            ]
        );
    }

    #[test]
    fn empty_listing_has_no_links() {
        assert!(parse_listing_page(&listing(""), ORIGIN).unwrap().is_empty());
    }

    #[test]
    fn anchors_outside_the_grid_are_ignored() {
        let markup = format!(
            r#"<nav><ul><li><a href="/en-us/pages/deals" data-telemetry-meta='{{"id":"x","index":0,"name":"x"}}'>Deals</a></li></ul></nav>{}"#,
            listing(&tile(0, "100"))
        );
        assert_eq!(parse_listing_page(&markup, ORIGIN).unwrap().len(), 1);
    }

    #[test]
    fn malformed_telemetry_is_a_deserialize_error() {
        let markup = listing(r#"<li><a href="/x" data-telemetry-meta="{not json"></a></li>"#);
        assert!(matches!(
            parse_listing_page(&markup, ORIGIN),
            Err(ScraperError::Deserialize { .. })
        ));
    }

    #[test]
    fn page_url_joins_base_and_number() {
        assert_eq!(
            listing_page_url("https://store.playstation.com/en-us/pages/browse/", 3),
            "https://store.playstation.com/en-us/pages/browse/3"
        );
    }
}
