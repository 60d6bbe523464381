//! Polled endpoints and URL resolution.

use crate::config::{IndexConfig, SourceConfig};
use crate::render::DisplayKind;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Produces a fresh URL for every poll.
///
/// Implemented for any `Fn() -> String`, so ad hoc resolvers can be plain closures.
pub trait UrlResolver: Send + Sync {
    fn resolve(&self) -> String;
}

impl<F> UrlResolver for F
where
    F: Fn() -> String + Send + Sync,
{
    fn resolve(&self) -> String {
        self()
    }
}

/// How the index query parameter is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexChoice {
    Fixed(u64),
    /// Uniform in `0..=max`
    Random { max: u64 },
}

/// Appends an index query parameter to a base URL on every call.
#[derive(Debug, Clone)]
pub struct IndexedUrl {
    base: String,
    param: String,
    choice: IndexChoice,
}

impl IndexedUrl {
    pub fn new(base: impl Into<String>, param: impl Into<String>, choice: IndexChoice) -> Self {
        Self {
            base: base.into(),
            param: param.into(),
            choice,
        }
    }

    /// Build from config; `None` when neither mode is set.
    pub fn from_config(base: &str, index: &IndexConfig) -> Option<Self> {
        let choice = match (index.fixed, index.random_max) {
            (Some(n), _) => IndexChoice::Fixed(n),
            (None, Some(max)) => IndexChoice::Random { max },
            (None, None) => return None,
        };
        Some(Self::new(base, index.param.clone(), choice))
    }

    fn pick(&self) -> u64 {
        match self.choice {
            IndexChoice::Fixed(n) => n,
            IndexChoice::Random { max } => rand::thread_rng().gen_range(0..=max),
        }
    }

    /// Operator-facing form of the URL, e.g. `http://h/history?index=<0..=5>`.
    pub fn describe(&self) -> String {
        let value = match self.choice {
            IndexChoice::Fixed(n) => n.to_string(),
            IndexChoice::Random { max } => format!("<0..={}>", max),
        };
        join_query(&self.base, &self.param, &value)
    }
}

impl UrlResolver for IndexedUrl {
    fn resolve(&self) -> String {
        let value = self.pick().to_string();
        match reqwest::Url::parse(&self.base) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair(&self.param, &value);
                url.into()
            }
            Err(_) => join_query(&self.base, &self.param, &value),
        }
    }
}

fn join_query(base: &str, param: &str, value: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", base, sep, param, value)
}

/// One configured JSON endpoint.
#[derive(Clone)]
pub struct Source {
    name: String,
    title: String,
    url: String,
    display: DisplayKind,
    resolver: Option<Arc<dyn UrlResolver>>,
}

impl Source {
    /// Create a table-style source with a static URL.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            url: url.into(),
            display: DisplayKind::Table,
            resolver: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_display(mut self, display: DisplayKind) -> Self {
        self.display = display;
        self
    }

    /// Resolve the URL per call instead of using the static one.
    pub fn with_resolver(mut self, resolver: impl UrlResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn display(&self) -> DisplayKind {
        self.display
    }

    /// Static URL, shown as the endpoint label.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL to request for this call.
    pub fn effective_url(&self) -> String {
        match &self.resolver {
            Some(resolver) => resolver.resolve(),
            None => self.url.clone(),
        }
    }

    /// `Endpoint: <url>` label for operator visibility.
    pub fn endpoint_label(&self) -> String {
        format!("Endpoint: {}", self.url)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("url", &self.url)
            .field("display", &self.display)
            .field("dynamic", &self.resolver.is_some())
            .finish()
    }
}

impl From<&SourceConfig> for Source {
    fn from(config: &SourceConfig) -> Self {
        let source = Source::new(config.name.clone(), config.url.clone())
            .with_title(config.display_title())
            .with_display(config.display);

        match config
            .index
            .as_ref()
            .and_then(|index| IndexedUrl::from_config(&config.url, index))
        {
            Some(indexed) => {
                let label = indexed.describe();
                let mut source = source.with_resolver(indexed);
                source.url = label;
                source
            }
            None => source,
        }
    }
}
