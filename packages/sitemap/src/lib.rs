//! RegelRecht Sitemap - Build Sitemaps.org and Google sitemaps.
//!
//! This crate builds XML sitemap documents from entry records. Every field
//! of an entry is checked and converted according to a declarative schema
//! of node rules before it is stored; rendering then turns the stored
//! entries into XML.
//!
//! # Example
//!
//! ```
//! use regelrecht_sitemap::{Record, SitemapDocument};
//!
//! let mut sitemap = SitemapDocument::google_image()?;
//! sitemap.add_entry(
//!     Record::new()
//!         .with("loc", "http://example.com/a")
//!         .with("lastmod", "2020-01-01")
//!         .with(
//!             "image",
//!             Record::new()
//!                 .with_item(Record::new().with("loc", "http://example.com/1.jpg"))
//!                 .with_item(Record::new().with("loc", "http://example.com/2.jpg")),
//!         ),
//! )?;
//!
//! let xml = sitemap.render()?;
//! assert!(xml.contains("<lastmod>2020-01-01T00:00:00+00:00</lastmod>"));
//! assert_eq!(xml.matches("<image:image>").count(), 2);
//! # Ok::<(), regelrecht_sitemap::SitemapError>(())
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, URL validation and ping settings
//! - [`types`]: Entry records and render trees
//! - [`error`]: Error types and Result alias
//! - [`schema`]: Node rules, schema registry and callback dispatch
//! - [`callbacks`]: Built-in validation and content callbacks
//! - [`processor`]: Entry validation and transformation
//! - [`render`]: Render trees to XML elements
//! - [`xml`]: XML element tree and serializer
//! - [`variants`]: Sitemap flavours and their schema extensions
//! - [`document`]: The sitemap document
//! - [`ping`]: Ping submission

pub mod callbacks;
pub mod config;
pub mod document;
pub mod error;
pub mod ping;
pub mod processor;
pub mod render;
pub mod schema;
pub mod types;
pub mod variants;
pub mod xml;

// Re-export commonly used items
pub use config::PingConfig;
pub use document::{DocumentState, PingOutcome, SitemapDocument};
pub use error::{ErrorKind, Result, SitemapError};
pub use ping::{HttpPingNotifier, PingNotifier};
pub use processor::ProcessOptions;
pub use schema::{CallbackRef, Fallback, NamePrefix, NodeRule, PrefixPolicy, SchemaRegistry};
pub use types::{entries_from_json, entries_from_yaml, Key, Record, RenderNode, RenderTree, Value};
pub use variants::{Extension, SitemapKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
