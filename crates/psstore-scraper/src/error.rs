use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("widget {widget:?} not found on page")]
    WidgetNotFound { widget: String },

    #[error("widget {widget:?} has no data-initial script id")]
    MissingScriptId { widget: String },

    #[error("script {script_id:?} referenced by widget {widget:?} not found")]
    ScriptNotFound { widget: String, script_id: String },

    #[error("payload of widget {widget:?} is not valid JSON: {source}")]
    Decode {
        widget: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("reference {key:?} does not resolve in the payload cache")]
    MissingReference { key: String },

    #[error("entry {entry:?} is missing field {field:?} ({expected})")]
    MissingField {
        entry: String,
        field: String,
        expected: &'static str,
    },

    #[error("cannot resolve page identity: {reason}")]
    InvalidIdentity { reason: String },

    #[error("invalid store link {href:?}")]
    InvalidLink { href: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `retry_after_secs` is the server's `Retry-After`, when it sent one
    /// in delta-seconds form.
    #[error(
        "rate limited by {url}{}",
        .retry_after_secs.map_or_else(String::new, |s| format!(" (retry after {s}s)"))
    )]
    RateLimited {
        url: String,
        retry_after_secs: Option<u64>,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

impl ScraperError {
    /// `true` when the error means a widget payload could not be located or
    /// decoded at all, as opposed to a present payload having the wrong shape.
    ///
    /// Optional aspects turn these into an absent value.
    #[must_use]
    pub fn is_locate_failure(&self) -> bool {
        matches!(
            self,
            ScraperError::WidgetNotFound { .. }
                | ScraperError::MissingScriptId { .. }
                | ScraperError::ScriptNotFound { .. }
                | ScraperError::Decode { .. }
        )
    }
}

/// A failed page, tagged with the page it came from.
///
/// This is the only failure shape callers see for a page: no partial
/// `Game` is ever produced alongside it.
#[derive(Debug, Error)]
#[error("extraction failed for {page}: {source}")]
pub struct PageError {
    pub page: String,
    #[source]
    pub source: ScraperError,
}

impl PageError {
    #[must_use]
    pub fn new(page: impl Into<String>, source: ScraperError) -> Self {
        Self {
            page: page.into(),
            source,
        }
    }
}
