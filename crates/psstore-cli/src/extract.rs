//! Command handlers. Each page is an independent extraction run; a failed
//! page is logged and skipped so one bad link does not abort the batch.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use futures::stream::{self, Stream, StreamExt};
use psstore_core::{AppConfig, Game};
use psstore_scraper::{extract_game, parse_listing_page, PageError, StoreClient};
use serde::Serialize;

/// Fetches and extracts every link, up to `max_concurrent_pages` at a time.
///
/// # Errors
///
/// Fails when the client cannot be built, `--id` is combined with several
/// links, or every page failed.
pub(crate) async fn run_game(
    config: &AppConfig,
    hrefs: &[String],
    id: Option<&str>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        id.is_none() || hrefs.len() == 1,
        "--id can only be used with a single link"
    );

    let client = StoreClient::from_config(config).context("failed to build store client")?;
    let delay = Duration::from_millis(config.inter_request_delay_ms);
    let max_concurrent = config.max_concurrent_pages.max(1);

    let results: Vec<Result<Game, PageError>> = paced(hrefs, delay)
        .map(|href| client.fetch_game(href, id))
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let games = collect_successes(results)?;
    tracing::info!(pages = games.len(), "extraction finished");
    write_json(&games, out)
}

/// Yields `items` in order, waiting `delay` before every item after the
/// first. Requests launched from this stream start at least `delay` apart
/// however many are in flight.
fn paced<I>(items: I, delay: Duration) -> impl Stream<Item = I::Item>
where
    I: IntoIterator,
{
    stream::iter(items.into_iter().enumerate()).then(move |(position, item)| async move {
        if position > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        item
    })
}

/// Keeps the extracted records, logging each failed page.
///
/// # Errors
///
/// Fails only when there were pages and none succeeded.
fn collect_successes(results: Vec<Result<Game, PageError>>) -> anyhow::Result<Vec<Game>> {
    let page_count = results.len();
    let mut games = Vec::with_capacity(page_count);
    let mut failed = 0usize;

    for result in results {
        match result {
            Ok(game) => games.push(game),
            Err(err) => {
                tracing::error!(page = %err.page, error = %err.source, "page extraction failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        tracing::warn!(failed, total = page_count, "some pages failed");
    }
    if page_count > 0 && failed == page_count {
        anyhow::bail!("all {failed} pages failed extraction");
    }
    Ok(games)
}

/// Extracts a record from saved markup.
///
/// # Errors
///
/// Fails when the file cannot be read or extraction fails.
pub(crate) fn run_parse(file: &Path, id: Option<&str>, out: Option<&Path>) -> anyhow::Result<()> {
    let markup = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let game = extract_game(&file.display().to_string(), &markup, id)?;
    write_json(&game, out)
}

/// Lists the game tiles on a saved browse page.
///
/// # Errors
///
/// Fails when the file cannot be read or a tile's metadata is malformed.
pub(crate) fn run_links(config: &AppConfig, file: &Path, out: Option<&Path>) -> anyhow::Result<()> {
    let markup = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let links = parse_listing_page(&markup, &config.store_origin)?;
    if links.is_empty() {
        tracing::info!(file = %file.display(), "no game tiles on page");
    }
    write_json(&links, out)
}

fn write_json<T: Serialize + ?Sized>(value: &T, out: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
