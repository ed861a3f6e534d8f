//! Sitemap document orchestration.
//!
//! A [`SitemapDocument`] owns the schema, the callback dispatch table, the
//! namespace and ping endpoint maps and the accepted entries. Entries are
//! processed once when they are added; rendering only reads them.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::config::{
    validate_namespace_prefix, validate_url, SITEMAPS_ORG_NAMESPACE, XML_ENCODING, XML_VERSION,
};
use crate::error::{Result, SitemapError};
use crate::ping::PingNotifier;
use crate::processor::{EntryProcessor, ProcessOptions};
use crate::render::TreeRenderer;
use crate::schema::{CallbackResolver, NodeRule, PrefixPolicy, SchemaRegistry};
use crate::types::{Record, RenderTree, Value};
use crate::variants::{Extension, SitemapKind};
use crate::xml::{write_document, XmlDocument, XmlElement};

/// Lifecycle state of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// No entries accepted yet.
    Empty,
    /// Entries accepted since the last render.
    Populated,
    /// Rendered at least once and unchanged since.
    Rendered,
}

/// Result of one ping submission.
#[derive(Debug)]
pub struct PingOutcome {
    /// Ping endpoint identifier, e.g. `google`.
    pub identifier: String,
    /// Sitemap URL that was submitted.
    pub sitemap: String,
    pub result: Result<()>,
}

impl PingOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// A sitemap under construction.
///
/// # Examples
/// ```
/// use regelrecht_sitemap::{Record, SitemapDocument};
///
/// let mut sitemap = SitemapDocument::sitemaps_org().unwrap();
/// sitemap
///     .add_entry(Record::new().with("loc", "http://example.com/").with("priority", 0.8))
///     .unwrap();
///
/// let xml = sitemap.render().unwrap();
/// assert!(xml.contains("<url><loc>http://example.com/</loc><priority>0.8</priority></url>"));
/// ```
#[derive(Debug)]
pub struct SitemapDocument {
    kind: SitemapKind,
    schema: SchemaRegistry,
    callbacks: CallbackResolver,
    entries: Vec<RenderTree>,
    /// Prefix to namespace URL; the empty prefix is the default namespace.
    namespaces: BTreeMap<String, String>,
    ping_urls: BTreeMap<String, String>,
    options: ProcessOptions,
    debug: bool,
    stylesheet: Option<String>,
    rendered: bool,
}

impl SitemapDocument {
    /// Create a document of the given flavour with its base rules,
    /// extensions, namespaces and ping endpoints in place.
    pub fn new(kind: SitemapKind) -> Result<Self> {
        let mut schema = SchemaRegistry::new();
        schema.merge(kind.base_rules())?;

        let mut document = Self {
            kind,
            schema,
            callbacks: CallbackResolver::with_builtins(PrefixPolicy::default())?,
            entries: Vec::new(),
            namespaces: BTreeMap::new(),
            ping_urls: BTreeMap::new(),
            options: ProcessOptions::default(),
            debug: false,
            stylesheet: None,
            rendered: false,
        };

        document.add_namespace(SITEMAPS_ORG_NAMESPACE, "")?;
        for (identifier, url) in kind.ping_urls() {
            document.add_ping_url(*identifier, *url)?;
        }
        for extension in kind.extensions() {
            extension.apply(&mut document)?;
        }
        Ok(document)
    }

    pub fn sitemaps_org() -> Result<Self> {
        Self::new(SitemapKind::SitemapsOrg)
    }

    pub fn google() -> Result<Self> {
        Self::new(SitemapKind::Google)
    }

    pub fn google_image() -> Result<Self> {
        Self::new(SitemapKind::GoogleImage)
    }

    pub fn google_video() -> Result<Self> {
        Self::new(SitemapKind::GoogleVideo)
    }

    pub fn google_news() -> Result<Self> {
        Self::new(SitemapKind::GoogleNews)
    }

    pub fn sitemap_index() -> Result<Self> {
        Self::new(SitemapKind::SitemapIndex)
    }

    /// Apply an extension. Entries accepted earlier are not re-validated.
    pub fn extend(&mut self, extension: Extension) -> Result<&mut Self> {
        extension.apply(self)?;
        Ok(self)
    }

    #[must_use]
    pub fn kind(&self) -> SitemapKind {
        self.kind
    }

    #[must_use]
    pub fn maximum_entries(&self) -> usize {
        self.kind.maximum_entries()
    }

    #[must_use]
    pub fn maximum_filesize(&self) -> u64 {
        self.kind.maximum_filesize()
    }

    #[must_use]
    pub fn root_node_name(&self) -> &'static str {
        self.kind.root_node_name()
    }

    #[must_use]
    pub fn entry_root_node_name(&self) -> &'static str {
        self.kind.entry_root_node_name()
    }

    // --- Entries ---

    /// Validate, transform and store one entry.
    ///
    /// The entry is stored only if it is accepted as a whole.
    ///
    /// # Errors
    /// * `MaximumEntries` if the document is full
    /// * `MissingRequiredNode`, `Validation` or `InvalidParameter` if the
    ///   entry is rejected
    /// * callback errors from resolving or invoking callbacks
    pub fn add_entry(&mut self, entry: Record) -> Result<&mut Self> {
        let maximum = self.maximum_entries();
        if self.entries.len() >= maximum {
            return Err(SitemapError::MaximumEntries { maximum });
        }

        let processor = EntryProcessor::new(&self.callbacks, self.options);
        let tree = processor.process(&entry, self.schema.rules())?;
        self.entries.push(tree);
        self.rendered = false;

        tracing::debug!(entries = self.entries.len(), maximum, "Accepted sitemap entry");
        Ok(self)
    }

    /// Add an entry given as a JSON object.
    ///
    /// # Errors
    /// `InvalidParameter` if `entry` is not an object, otherwise as
    /// [`add_entry`](Self::add_entry).
    pub fn add_json_entry(&mut self, entry: serde_json::Value) -> Result<&mut Self> {
        match entry {
            serde_json::Value::Object(map) => self.add_entry(Record::from_json_map(map)),
            other => Err(SitemapError::InvalidParameter(format!(
                "entry must be a JSON object, got {other}"
            ))),
        }
    }

    /// Add entries in order, stopping at the first rejected one.
    ///
    /// Entries accepted before the failure stay in the document.
    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = Record>) -> Result<&mut Self> {
        for entry in entries {
            self.add_entry(entry)?;
        }
        Ok(self)
    }

    /// Accepted entries in document order.
    #[must_use]
    pub fn entries(&self) -> &[RenderTree] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> DocumentState {
        if self.rendered {
            DocumentState::Rendered
        } else if self.entries.is_empty() {
            DocumentState::Empty
        } else {
            DocumentState::Populated
        }
    }

    /// Drop all entries. Schema, namespaces and settings are kept.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.rendered = false;
    }

    // --- Output ---

    /// Render the document to XML.
    ///
    /// Rendering does not touch the stored entries, so repeated calls give
    /// identical output. Exceeding the size limit is logged, not rejected.
    pub fn render(&mut self) -> Result<String> {
        let mut root = XmlElement::new(self.root_node_name());
        for (prefix, url) in &self.namespaces {
            let attribute = if prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{prefix}")
            };
            root = root.with_attribute(attribute, url.as_str());
        }

        let renderer = TreeRenderer::new(self.entry_root_node_name());
        let document = XmlDocument {
            version: XML_VERSION.to_string(),
            encoding: XML_ENCODING.to_string(),
            stylesheet: self.stylesheet.clone(),
            root: renderer.render_into(root, &self.entries),
        };
        let xml = write_document(&document, self.debug)?;

        let bytes = xml.len() as u64;
        let maximum = self.maximum_filesize();
        if bytes > maximum {
            tracing::warn!(bytes, maximum, "Rendered sitemap exceeds the maximum file size");
        }

        self.rendered = true;
        Ok(xml)
    }

    /// Render the document into `writer`.
    pub fn write_to(&mut self, mut writer: impl Write) -> Result<()> {
        let xml = self.render()?;
        writer.write_all(xml.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Render the document to a file, replacing any existing content.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let xml = self.render()?;
        std::fs::write(path, xml)?;
        Ok(())
    }

    // --- Namespaces ---

    /// Declare a namespace on the root element, replacing any URL already
    /// bound to `prefix`. The empty prefix sets the default namespace.
    ///
    /// # Errors
    /// `InvalidParameter` for an invalid URL or prefix.
    pub fn add_namespace(&mut self, url: &str, prefix: &str) -> Result<()> {
        validate_url(url)?;
        validate_namespace_prefix(prefix)?;
        self.namespaces.insert(prefix.to_string(), url.to_string());
        Ok(())
    }

    /// Namespace URL bound to `prefix`.
    ///
    /// # Errors
    /// `InvalidParameter` if no namespace uses `prefix`.
    pub fn namespace_schema(&self, prefix: &str) -> Result<&str> {
        self.namespaces
            .get(prefix)
            .map(String::as_str)
            .ok_or_else(|| SitemapError::InvalidParameter(format!("unknown namespace prefix '{prefix}'")))
    }

    #[must_use]
    pub fn has_namespace_schema(&self, prefix: &str) -> bool {
        self.namespaces.contains_key(prefix)
    }

    /// All namespaces as `(prefix, url)`, ordered by prefix.
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    // --- Ping endpoints ---

    /// Register a ping endpoint, replacing one with the same identifier.
    ///
    /// The URL-encoded sitemap location is appended to `url` on submission.
    pub fn add_ping_url(&mut self, identifier: impl Into<String>, url: impl Into<String>) -> Result<()> {
        let identifier = identifier.into();
        let url = url.into();
        if identifier.is_empty() {
            return Err(SitemapError::InvalidParameter(
                "ping identifier must not be empty".to_string(),
            ));
        }
        validate_url(&url)?;
        self.ping_urls.insert(identifier, url);
        Ok(())
    }

    /// Endpoint registered under `identifier`.
    ///
    /// # Errors
    /// `InvalidParameter` for an unknown identifier.
    pub fn ping_url(&self, identifier: &str) -> Result<&str> {
        self.ping_urls
            .get(identifier)
            .map(String::as_str)
            .ok_or_else(|| SitemapError::InvalidParameter(format!("unknown ping identifier '{identifier}'")))
    }

    #[must_use]
    pub fn has_ping_url(&self, identifier: &str) -> bool {
        self.ping_urls.contains_key(identifier)
    }

    pub fn ping_urls(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ping_urls.iter().map(|(i, u)| (i.as_str(), u.as_str()))
    }

    /// Submit sitemap URLs to the endpoint registered under `identifier`.
    ///
    /// Each submission is independent: one failing request does not stop
    /// the others, and its error is reported in its [`PingOutcome`].
    ///
    /// # Errors
    /// `InvalidParameter`, before any request is made, if `sitemaps` is
    /// empty, holds an invalid URL, or `identifier` is unknown.
    pub fn send_ping<S: AsRef<str>>(
        &self,
        notifier: &impl PingNotifier,
        identifier: &str,
        sitemaps: &[S],
    ) -> Result<Vec<PingOutcome>> {
        check_sitemaps(sitemaps)?;
        let endpoint = self.ping_url(identifier)?;
        Ok(submit_all(notifier, identifier, endpoint, sitemaps))
    }

    /// Submit sitemap URLs to every registered endpoint.
    ///
    /// # Errors
    /// `InvalidParameter` if no endpoint is registered, or as
    /// [`send_ping`](Self::send_ping).
    pub fn send_pings<S: AsRef<str>>(
        &self,
        notifier: &impl PingNotifier,
        sitemaps: &[S],
    ) -> Result<Vec<PingOutcome>> {
        check_sitemaps(sitemaps)?;
        if self.ping_urls.is_empty() {
            return Err(SitemapError::InvalidParameter(
                "no ping endpoints registered".to_string(),
            ));
        }
        Ok(self
            .ping_urls
            .iter()
            .flat_map(|(identifier, endpoint)| submit_all(notifier, identifier, endpoint, sitemaps))
            .collect())
    }

    // --- Switches ---

    pub fn enable_validation(&mut self) {
        self.options.use_validation = true;
    }

    /// Skip validation callbacks for entries added from now on.
    pub fn disable_validation(&mut self) {
        self.options.use_validation = false;
    }

    pub fn enable_transform(&mut self) {
        self.options.use_transform = true;
    }

    /// Skip content callbacks for entries added from now on.
    pub fn disable_transform(&mut self) {
        self.options.use_transform = false;
    }

    #[must_use]
    pub fn options(&self) -> ProcessOptions {
        self.options
    }

    /// Pretty-print rendered output.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Reference an XSL stylesheet from the rendered document.
    pub fn set_stylesheet(&mut self, href: impl Into<String>) {
        self.stylesheet = Some(href.into());
    }

    #[must_use]
    pub fn stylesheet(&self) -> Option<&str> {
        self.stylesheet.as_deref()
    }

    // --- Schema and callbacks ---

    #[must_use]
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Insert or replace the rule at `path`.
    pub fn register_node(
        &mut self,
        path: impl IntoIterator<Item = impl Into<String>>,
        rule: NodeRule,
    ) -> Result<()> {
        self.schema.register(path, rule)
    }

    pub fn remove_node<S: AsRef<str>>(&mut self, path: impl IntoIterator<Item = S>) -> Option<NodeRule> {
        self.schema.remove(path)
    }

    pub fn set_node_required<S: AsRef<str>>(
        &mut self,
        path: impl IntoIterator<Item = S>,
        required: bool,
    ) -> Result<()> {
        self.schema.set_required(path, required)
    }

    /// Register an external validation callback usable as
    /// `CallbackRef::external(name)`.
    pub fn register_validator<F>(&mut self, name: impl Into<String>, function: F) -> Result<()>
    where
        F: Fn(&Value, &[Value]) -> bool + Send + Sync + 'static,
    {
        self.callbacks.register_validator(name, function)
    }

    /// Register an external content callback usable as
    /// `CallbackRef::external(name)`.
    pub fn register_transform<F>(&mut self, name: impl Into<String>, function: F) -> Result<()>
    where
        F: Fn(&Value, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.callbacks.register_transform(name, function)
    }

    #[must_use]
    pub fn callbacks(&self) -> &CallbackResolver {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut CallbackResolver {
        &mut self.callbacks
    }
}

fn check_sitemaps<S: AsRef<str>>(sitemaps: &[S]) -> Result<()> {
    if sitemaps.is_empty() {
        return Err(SitemapError::InvalidParameter(
            "at least one sitemap URL is required".to_string(),
        ));
    }
    sitemaps.iter().try_for_each(|sitemap| validate_url(sitemap.as_ref()))
}

fn submit_all<S: AsRef<str>>(
    notifier: &impl PingNotifier,
    identifier: &str,
    endpoint: &str,
    sitemaps: &[S],
) -> Vec<PingOutcome> {
    sitemaps
        .iter()
        .map(|sitemap| {
            let sitemap = sitemap.as_ref();
            let result = notifier.submit(endpoint, sitemap);
            match &result {
                Ok(()) => tracing::info!(endpoint = identifier, sitemap, "Ping submitted"),
                Err(e) => {
                    tracing::warn!(endpoint = identifier, sitemap, error = %e, "Ping submission failed");
                }
            }
            PingOutcome {
                identifier: identifier.to_string(),
                sitemap: sitemap.to_string(),
                result,
            }
        })
        .collect()
}
