use std::sync::LazyLock;

use psstore_core::{Description, Info, InfoProductDetails};
use regex::Regex;
use serde_json::Value;

use super::genres;
use super::title::concept_release;
use crate::error::ScraperError;
use crate::graph::{Entry, PayloadGraph};

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line-break pattern"));

pub(super) fn project_product(graph: &PayloadGraph, key: &str) -> Result<Info, ScraperError> {
    let product = graph.resolve(key)?;

    Ok(Info {
        genres: genres(&product)?,
        publisher: product.opt_str("publisherName")?.map(str::to_string),
        release: product.str("releaseDate")?.to_string(),
        description: descriptions(&product)?,
        product: Some(InfoProductDetails {
            spoken_languages: product.opt_str_list("spokenLanguages")?,
            screen_languages: product.opt_str_list("screenLanguages")?,
            platforms: product.opt_str_list("platforms")?,
            product_type: product.opt_str("type")?.map(str::to_string),
        }),
    })
}

pub(super) fn project_concept(graph: &PayloadGraph, key: &str) -> Result<Info, ScraperError> {
    let concept = graph.resolve(key)?;
    let release = concept_release(&concept)?.ok_or_else(|| ScraperError::MissingField {
        entry: concept.key().to_string(),
        field: "releaseDate.value".to_string(),
        expected: "string",
    })?;

    Ok(Info {
        genres: genres(&concept)?,
        publisher: concept.opt_str("publisherName")?.map(str::to_string),
        release,
        description: descriptions(&concept)?,
        product: None,
    })
}

fn descriptions(entity: &Entry<'_>) -> Result<Vec<Description>, ScraperError> {
    entity
        .array("descriptions")?
        .iter()
        .map(|item| {
            let section = item.get("type").and_then(Value::as_str);
            let text = item.get("value").and_then(Value::as_str);
            match (section, text) {
                (Some(section), Some(text)) => Ok(Description {
                    section: section.to_string(),
                    text: normalize_line_breaks(text),
                }),
                _ => Err(ScraperError::MissingField {
                    entry: entity.key().to_string(),
                    field: "descriptions".to_string(),
                    expected: "description objects with type and value",
                }),
            }
        })
        .collect()
}

/// `<br>`, `<br/>` and `<br />` become `\n`; other markup is kept.
fn normalize_line_breaks(text: &str) -> String {
    LINE_BREAK.replace_all(text, "\n").into_owned()
}
