//! The `Game` record and its sub-records.
//!
//! Fields the storefront only exposes for purchasable products (platforms,
//! star rating, languages, ...) live in `*ProductDetails` structs that are
//! flattened into their parent and are `None` for concept pages, so a
//! concept record serializes without those keys at all rather than with
//! `null`s.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::ProductIdentity;

/// One fully extracted storefront page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub product_id: ProductIdentity,
    pub image: Vec<MediaImage>,
    pub title: Title,
    pub price: Price,
    pub content_rating: Option<ContentRating>,
    pub editions: Option<Vec<EditionItem>>,
    pub addons: Option<Vec<Addon>>,
    pub info: Info,
    /// When the page was extracted.
    pub info_date: DateTime<Utc>,
}

/// A storefront media asset, e.g. `("MASTER", "https://image.api.playstation.com/...")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaImage {
    pub role: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub name: String,
    pub publisher: Option<String>,
    pub release: Option<String>,
    #[serde(flatten)]
    pub product: Option<TitleProductDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleProductDetails {
    /// Edition name, e.g. `"Deluxe Edition"`; `None` for the standard edition.
    pub edition: Option<String>,
    pub platforms: Vec<String>,
    pub star_rating: StarRating,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRating {
    pub rating: Option<f64>,
    pub count: Option<RatingCount>,
}

/// The storefront emits the ratings count as either a number or a
/// pre-formatted string such as `"1.2K"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingCount {
    Count(u64),
    Text(String),
}

/// Either the purchasable offers for a product or, for a concept, whether
/// it is only announced. The two shapes never mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Offers(Vec<PriceOffer>),
    Announcement { is_announce: bool },
}

impl Price {
    /// The offer list, or `None` for an announcement marker.
    #[must_use]
    pub fn offers(&self) -> Option<&[PriceOffer]> {
        match self {
            Price::Offers(offers) => Some(offers),
            Price::Announcement { .. } => None,
        }
    }
}

/// One call-to-action offer, e.g. `ADD_TO_CART` or `PREORDER`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOffer {
    #[serde(rename = "type")]
    pub offer_type: String,
    pub info: PriceInfo,
}

/// Price detail exactly as the storefront reports it, minus its GraphQL
/// `__typename` discriminator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceInfo {
    #[serde(default)]
    pub base_price: Option<String>,
    #[serde(default)]
    pub discounted_price: Option<String>,
    #[serde(default)]
    pub discount_text: Option<String>,
    #[serde(default)]
    pub service_branding: Option<Vec<String>>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub upsell_text: Option<String>,
    #[serde(default)]
    pub base_price_value: Option<i64>,
    #[serde(default)]
    pub discounted_value: Option<i64>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub qualifications: Option<Vec<Value>>,
    #[serde(default)]
    pub applicability: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub reward_id: Option<String>,
    #[serde(default)]
    pub is_free: Option<bool>,
    #[serde(default)]
    pub is_exclusive: Option<bool>,
    #[serde(default)]
    pub is_tied_to_subscription: Option<bool>,
    /// Fields this crate does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRating {
    /// Rating name, e.g. `"ESRB_MATURE"`.
    pub name: String,
    /// Rating badge image URL.
    pub image: String,
    pub interactive_elements: Vec<Option<String>>,
    pub descriptors: Vec<Option<String>>,
}

/// One sibling edition listed in the upsell widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionItem {
    pub id: String,
    pub category: Option<String>,
    pub platforms: Vec<String>,
    pub image: Vec<MediaImage>,
    pub edition: Option<EditionDetails>,
    pub content_rating: Option<String>,
    pub genres: Option<Vec<String>>,
    pub name: String,
    pub price: Vec<PriceOffer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionDetails {
    pub name: Option<String>,
    pub features: Vec<String>,
    #[serde(rename = "type")]
    pub edition_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addon {
    pub id: String,
    /// Box-art URL.
    pub image: String,
    pub genres: Option<Vec<String>>,
    pub classification: Option<String>,
    pub name: String,
    pub platforms: Vec<String>,
    #[serde(rename = "type")]
    pub addon_type: Option<String>,
    pub price: Option<AddonPrice>,
}

/// Add-on price detail, minus its `__typename` discriminator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonPrice {
    #[serde(default)]
    pub discounted_price: Option<String>,
    #[serde(default)]
    pub discount_text: Option<String>,
    #[serde(default)]
    pub is_exclusive: Option<bool>,
    #[serde(default)]
    pub upsell_text: Option<String>,
    #[serde(default)]
    pub upsell_service_branding: Option<Vec<String>>,
    #[serde(default)]
    pub service_branding: Option<Vec<String>>,
    #[serde(default)]
    pub base_price: Option<String>,
    #[serde(default)]
    pub is_free: Option<bool>,
    #[serde(default)]
    pub is_tied_to_subscription: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Product details are present exactly when at least one of their keys is
/// present on the wire, so a concept record reads back as a concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "InfoWire")]
pub struct Info {
    pub genres: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub release: String,
    pub description: Vec<Description>,
    #[serde(flatten)]
    pub product: Option<InfoProductDetails>,
}

/// Read side of [`Info`]: each product key is `None` when absent and
/// `Some(None)` when present as `null`.
#[derive(Deserialize)]
struct InfoWire {
    genres: Option<Vec<String>>,
    publisher: Option<String>,
    release: String,
    description: Vec<Description>,
    #[serde(default, deserialize_with = "present")]
    spoken_languages: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    screen_languages: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    platforms: Option<Option<Vec<String>>>,
    #[serde(default, rename = "type", deserialize_with = "present")]
    product_type: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<InfoWire> for Info {
    fn from(wire: InfoWire) -> Self {
        let any_product_key = wire.spoken_languages.is_some()
            || wire.screen_languages.is_some()
            || wire.platforms.is_some()
            || wire.product_type.is_some();
        let product = any_product_key.then(|| InfoProductDetails {
            spoken_languages: wire.spoken_languages.flatten(),
            screen_languages: wire.screen_languages.flatten(),
            platforms: wire.platforms.flatten(),
            product_type: wire.product_type.flatten(),
        });
        Self {
            genres: wire.genres,
            publisher: wire.publisher,
            release: wire.release,
            description: wire.description,
            product,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoProductDetails {
    pub spoken_languages: Option<Vec<String>>,
    pub screen_languages: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
    /// Storefront product type, e.g. `"FULL_GAME"`.
    #[serde(rename = "type")]
    pub product_type: Option<String>,
}

/// One localized description paragraph with `<br>` markup turned into `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Section type, e.g. `"LONG"` or `"COMPATIBILITY_NOTICE"`.
    #[serde(rename = "type")]
    pub section: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept_title() -> Title {
        Title {
            name: "Marathon".to_string(),
            publisher: Some("Bungie".to_string()),
            release: None,
            product: None,
        }
    }

    #[test]
    fn concept_title_omits_product_only_keys() {
        let json = serde_json::to_value(concept_title()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("name"));
        assert!(!obj.contains_key("platforms"));
        assert!(!obj.contains_key("star_rating"));
        assert!(!obj.contains_key("edition"));
    }

    #[test]
    fn product_title_keeps_null_edition() {
        let title = Title {
            product: Some(TitleProductDetails {
                edition: None,
                platforms: vec!["PS4".to_string()],
                star_rating: StarRating {
                    rating: Some(4.5),
                    count: Some(RatingCount::Count(1200)),
                },
                category: Some("GAME".to_string()),
            }),
            ..concept_title()
        };
        let json = serde_json::to_value(&title).unwrap();
        assert_eq!(json["edition"], Value::Null);
        assert_eq!(json["platforms"], serde_json::json!(["PS4"]));
        assert_eq!(json["star_rating"]["count"], serde_json::json!(1200));
    }

    #[test]
    fn announcement_price_is_a_single_object() {
        let json = serde_json::to_value(Price::Announcement { is_announce: true }).unwrap();
        assert_eq!(json, serde_json::json!({"is_announce": true}));
    }

    #[test]
    fn price_info_keeps_unmodelled_fields() {
        let info: PriceInfo = serde_json::from_value(serde_json::json!({
            "basePrice": "$69.99",
            "isFree": false,
            "skuId": "abc"
        }))
        .unwrap();
        assert_eq!(info.base_price.as_deref(), Some("$69.99"));
        assert_eq!(info.is_free, Some(false));
        assert_eq!(info.extra.get("skuId"), Some(&serde_json::json!("abc")));
    }

    fn concept_info() -> Info {
        Info {
            genres: None,
            publisher: Some("Bungie".to_string()),
            release: "2026".to_string(),
            description: vec![Description {
                section: "SHORT".to_string(),
                text: "Coming\nsoon.".to_string(),
            }],
            product: None,
        }
    }

    #[test]
    fn concept_info_reads_back_as_concept() {
        let info = concept_info();
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("spoken_languages").is_none());
        let reread: Info = serde_json::from_value(json).unwrap();
        assert_eq!(reread, info);
    }

    #[test]
    fn product_info_with_null_details_reads_back_as_product() {
        let info = Info {
            product: Some(InfoProductDetails {
                spoken_languages: None,
                screen_languages: None,
                platforms: Some(vec!["PS5".to_string()]),
                product_type: None,
            }),
            ..concept_info()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["spoken_languages"], Value::Null);
        let reread: Info = serde_json::from_value(json).unwrap();
        assert_eq!(reread, info);
    }

    #[test]
    fn info_with_only_null_product_keys_is_still_a_product() {
        let info: Info = serde_json::from_value(serde_json::json!({
            "genres": null,
            "publisher": null,
            "release": "2024-03-01T00:00:00Z",
            "description": [],
            "spoken_languages": null,
            "screen_languages": null,
            "platforms": null,
            "type": null
        }))
        .unwrap();
        assert_eq!(
            info.product,
            Some(InfoProductDetails {
                spoken_languages: None,
                screen_languages: None,
                platforms: None,
                product_type: None,
            })
        );
    }

    #[test]
    fn rating_count_accepts_text() {
        let rating: StarRating =
            serde_json::from_value(serde_json::json!({"rating": 4.1, "count": "1.2K"})).unwrap();
        assert_eq!(rating.count, Some(RatingCount::Text("1.2K".to_string())));
    }
}
