//! Rendered-page fixtures shared by the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};

pub const PRODUCT_ID: &str = "UP0001-CUSA00001_00-00000000000000EN";
pub const PRODUCT_KEY: &str = "Product:UP0001-CUSA00001_00-00000000000000EN";
pub const DELUXE_KEY: &str = "Product:UP0001-CUSA00001_00-DELUXE0000000000";
pub const CONCEPT_ID: &str = "10001234";

/// One widget container plus its payload script.
pub fn widget(name: &str, payload: &Value) -> String {
    format!(
        r#"<div data-mfe-name="{name}" data-initial="env:{name}"><span>rendered</span></div>
<script id="env:{name}" type="application/json">{payload}</script>"#
    )
}

pub fn page(widgets: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Store</title></head><body>{}</body></html>",
        widgets.concat()
    )
}

fn cta(kind: &str, base: &str, discounted: &str) -> Value {
    json!({
        "__typename": "GameCTA",
        "type": kind,
        "price": {
            "__typename": "SkuPrice",
            "basePrice": base,
            "discountedPrice": discounted,
            "discountText": null,
            "serviceBranding": ["NONE"],
            "currencyCode": "USD",
            "isFree": false,
            "isExclusive": false,
            "isTiedToSubscription": false
        }
    })
}

fn product_args() -> Value {
    json!({"productId": PRODUCT_ID})
}

pub fn background_widget() -> String {
    widget(
        "gameBackgroundImage",
        &json!({"args": product_args(), "cache": {PRODUCT_KEY: {
            "__typename": "Product",
            "media": [
                {"__typename": "Media", "role": "BACKGROUND", "type": "IMAGE", "url": "https://img/bg.jpg"},
                {"__typename": "Media", "role": "MASTER", "type": "IMAGE", "url": "https://img/master.png"}
            ]
        }}}),
    )
}

pub fn title_widget() -> String {
    widget(
        "gameTitle",
        &json!({"args": product_args(), "cache": {PRODUCT_KEY: {
            "__typename": "Product",
            "edition": null,
            "name": "Example Game",
            "platforms": ["PS4", "PS5"],
            "publisherName": "Example Studio",
            "releaseDate": "2024-03-01T00:00:00Z",
            "starRating": {"__typename": "StarRating", "averageRating": 4.5, "totalRatingsCount": 1200},
            "topCategory": "GAME"
        }}}),
    )
}

pub fn price_widget() -> String {
    widget(
        "ctaWithPrice",
        &json!({"args": product_args(), "cache": {
            PRODUCT_KEY: {"webctas": [
                {"__ref": "GameCTA:ADD_TO_CART:STD"},
                {"__ref": "GameCTA:UPSELL_PS_PLUS_DISCOUNT:STD"}
            ]},
            "GameCTA:ADD_TO_CART:STD": cta("ADD_TO_CART", "$69.99", "$34.99"),
            "GameCTA:UPSELL_PS_PLUS_DISCOUNT:STD": cta("UPSELL_PS_PLUS_DISCOUNT", "$69.99", "$27.99")
        }}),
    )
}

pub fn content_rating_widget() -> String {
    widget(
        "contentRating",
        &json!({"args": product_args(), "cache": {PRODUCT_KEY: {"contentRating": {
            "__typename": "ContentRating",
            "description": "ESRB_TEEN",
            "name": "ESRB_TEEN",
            "url": "https://img/esrb-t.png",
            "interactiveElements": [{"description": "In-Game Purchases"}],
            "descriptors": [{"description": "Violence"}, {"description": null}]
        }}}}),
    )
}

pub fn upsell_widget() -> String {
    let sibling = |key: &str, id: &str, edition: Value, cta_key: &str| {
        json!({
            "__typename": "Product",
            "id": id,
            "topCategory": "GAME",
            "platforms": ["PS5"],
            "media": [{"role": "MASTER", "url": format!("https://img/{id}.png")}],
            "edition": edition,
            "contentRating": {"name": "ESRB_TEEN"},
            "localizedGenres": [{"value": "Action"}],
            "name": format!("Example Game {key}"),
            "webctas": [{"__ref": cta_key}],
            "concept": {"__ref": format!("Concept:{CONCEPT_ID}")}
        })
    };
    widget(
        "upsell",
        &json!({"args": product_args(), "cache": {
            PRODUCT_KEY: sibling("Standard", PRODUCT_ID, Value::Null, "GameCTA:STD"),
            DELUXE_KEY: sibling("Deluxe", "UP0001-CUSA00001_00-DELUXE0000000000", json!({
                "name": "Deluxe Edition",
                "features": ["Full game", "Digital artbook"],
                "type": "DELUXE"
            }), "GameCTA:DLX"),
            format!("Concept:{CONCEPT_ID}"): {"products": [{"__ref": PRODUCT_KEY}, {"__ref": DELUXE_KEY}]},
            "GameCTA:STD": cta("ADD_TO_CART", "$69.99", "$34.99"),
            "GameCTA:DLX": cta("ADD_TO_CART", "$89.99", "$44.99")
        }}),
    )
}

pub fn addons_widget() -> String {
    widget(
        "addOns",
        &json!({"args": product_args(), "cache": {
            "ROOT_QUERY": {
                "__typename": "Query",
                format!("productRetrieve({{\"productId\":\"{PRODUCT_ID}\"}})"): {
                    "__typename": "Product",
                    "addOnProducts": [{"__ref": "Product:ADDON-1"}]
                }
            },
            "Product:ADDON-1": {
                "__typename": "Product",
                "id": "ADDON-1",
                "boxArt": {"url": "https://img/addon.png"},
                "localizedGenres": null,
                "localizedStoreDisplayClassification": "Add-On",
                "name": "Season Pass",
                "platforms": ["PS5"],
                "type": "ADD_ON",
                "price": {"__typename": "SkuPrice", "basePrice": "$19.99", "discountedPrice": "$19.99", "isFree": false}
            }
        }}),
    )
}

pub fn info_widget() -> String {
    widget(
        "gameInfo",
        &json!({"args": product_args(), "cache": {PRODUCT_KEY: {
            "localizedGenres": [{"value": "Action"}, {"value": "Adventure"}],
            "publisherName": "Example Studio",
            "releaseDate": "2024-03-01T00:00:00Z",
            "spokenLanguages": ["English", "French"],
            "screenLanguages": ["English"],
            "platforms": ["PS4", "PS5"],
            "type": "FULL_GAME",
            "descriptions": [
                {"type": "LONG", "value": "Explore.<br>Fight.<br/>Survive."},
                {"type": "COMPATIBILITY_NOTICE", "value": "Online features require an account."}
            ]
        }}}),
    )
}

/// A product page with every widget.
pub fn product_page() -> String {
    page(&[
        background_widget(),
        title_widget(),
        price_widget(),
        content_rating_widget(),
        upsell_widget(),
        addons_widget(),
        info_widget(),
    ])
}

/// A concept page for a title that is only announced: no default product,
/// no rating, no add-ons, no editions list.
pub fn concept_page() -> String {
    let key = format!("Concept:{CONCEPT_ID}");
    let args = json!({"conceptId": CONCEPT_ID});
    page(&[
        widget(
            "gameBackgroundImage",
            &json!({"args": args, "cache": {&key: {
                "media": [{"role": "BACKGROUND", "url": "https://img/concept-bg.jpg"}]
            }}}),
        ),
        widget(
            "gameTitle",
            &json!({"args": args, "cache": {&key: {
                "name": "Announced Game",
                "publisherName": "Example Studio",
                "releaseDate": {"type": "YEAR", "value": "2026"}
            }}}),
        ),
        widget(
            "ctaWithPrice",
            &json!({"args": args, "cache": {&key: {"isAnnounce": true}}}),
        ),
        widget(
            "upsell",
            &json!({"args": args, "cache": {&key: {"name": "Announced Game"}}}),
        ),
        widget(
            "gameInfo",
            &json!({"args": args, "cache": {&key: {
                "localizedGenres": [],
                "publisherName": "Example Studio",
                "releaseDate": {"type": "YEAR", "value": "2026"},
                "descriptions": [{"type": "SHORT", "value": "Coming<br />soon."}]
            }}}),
        ),
    ])
}
