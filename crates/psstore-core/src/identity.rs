use std::fmt;

use serde::{Deserialize, Serialize};

/// Cache-key prefix the storefront uses for purchasable products.
pub const PRODUCT_KEY_PREFIX: &str = "Product:";
/// Cache-key prefix the storefront uses for concepts.
pub const CONCEPT_KEY_PREFIX: &str = "Concept:";

/// Which addressing scheme a page resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
    Product,
    Concept,
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKind::Product => write!(f, "product"),
            IdentityKind::Concept => write!(f, "concept"),
        }
    }
}

/// The canonical cache key a page is addressed by.
///
/// Resolved once per page from the background-image widget and then shared,
/// read-only, by every projector. Serialized as the pair `["product", key]`
/// or `["concept", key]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "(IdentityKind, String)", from = "(IdentityKind, String)")]
pub enum ProductIdentity {
    /// A single purchasable edition, keyed `Product:<id>`.
    Product(String),
    /// A logical title with zero or several editions, keyed `Concept:<id>`.
    Concept(String),
}

impl ProductIdentity {
    /// Builds a product identity from a bare storefront product id.
    #[must_use]
    pub fn product_from_id(id: &str) -> Self {
        Self::Product(format!("{PRODUCT_KEY_PREFIX}{id}"))
    }

    /// Builds a concept identity from a bare storefront concept id.
    #[must_use]
    pub fn concept_from_id(id: &str) -> Self {
        Self::Concept(format!("{CONCEPT_KEY_PREFIX}{id}"))
    }

    #[must_use]
    pub fn kind(&self) -> IdentityKind {
        match self {
            Self::Product(_) => IdentityKind::Product,
            Self::Concept(_) => IdentityKind::Concept,
        }
    }

    /// The full cache key, e.g. `"Product:UP0001-CUSA00001_00-0000000000000000"`.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Product(key) | Self::Concept(key) => key,
        }
    }

    /// The key with its `Product:` / `Concept:` prefix stripped.
    ///
    /// Keys that do not carry the expected prefix are returned unchanged.
    #[must_use]
    pub fn id(&self) -> &str {
        let prefix = match self {
            Self::Product(_) => PRODUCT_KEY_PREFIX,
            Self::Concept(_) => CONCEPT_KEY_PREFIX,
        };
        let key = self.key();
        key.strip_prefix(prefix).unwrap_or(key)
    }
}

impl From<ProductIdentity> for (IdentityKind, String) {
    fn from(identity: ProductIdentity) -> Self {
        match identity {
            ProductIdentity::Product(key) => (IdentityKind::Product, key),
            ProductIdentity::Concept(key) => (IdentityKind::Concept, key),
        }
    }
}

impl From<(IdentityKind, String)> for ProductIdentity {
    fn from((kind, key): (IdentityKind, String)) -> Self {
        match kind {
            IdentityKind::Product => Self::Product(key),
            IdentityKind::Concept => Self::Concept(key),
        }
    }
}

impl fmt::Display for ProductIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.key())
    }
}
