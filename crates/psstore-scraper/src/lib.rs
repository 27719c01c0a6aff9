//! Extraction of `Game` records from rendered storefront pages.
//!
//! A page embeds one JSON payload per widget. [`StorePage`] locates them,
//! [`PayloadGraph`] resolves references inside one payload,
//! [`resolve_identity`] decides product vs concept, the [`project`] table
//! reads each aspect and [`GameAssembler`] puts the record together.
//! [`StoreClient`] fetches pages over HTTP and [`parse_listing_page`] reads
//! game links off browse pages.

pub mod assemble;
pub mod client;
pub mod error;
pub mod graph;
pub mod identity;
pub mod link;
pub mod listing;
pub mod payload;
pub mod project;
mod rate_limit;

pub use assemble::{extract_game, GameAssembler, Resolved, Unresolved};
pub use client::StoreClient;
pub use error::{PageError, ScraperError};
pub use graph::{Entry, EntryId, PayloadGraph};
pub use identity::resolve_identity;
pub use link::StoreLink;
pub use listing::{listing_page_url, parse_listing_page, GameLink};
pub use payload::{RawPayload, StorePage, Widget};
