//! Shared types for the storefront extractor: the `Game` record, the page
//! identity it is keyed by, and application configuration.

pub mod app_config;
pub mod config;
pub mod game;
pub mod identity;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_STORE_ORIGIN};
pub use game::{
    Addon, AddonPrice, ContentRating, Description, EditionDetails, EditionItem, Game, Info,
    InfoProductDetails, MediaImage, Price, PriceInfo, PriceOffer, RatingCount, StarRating, Title,
    TitleProductDetails,
};
pub use identity::{IdentityKind, ProductIdentity, CONCEPT_KEY_PREFIX, PRODUCT_KEY_PREFIX};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
