//! Sitemap flavours.
//!
//! Every flavour starts from a base rule set and applies an ordered list of
//! [`Extension`]s to the document. Google image, video and news sitemaps are
//! the Google base plus their extensions; a sitemap index is the
//! Sitemaps.org base without `changefreq` and `priority`.

pub mod google;
pub mod news;
pub mod sitemaps_org;

use crate::config::{
    GOOGLE_MAXIMUM_FILESIZE, GOOGLE_PING_IDENTIFIER, GOOGLE_PING_URL, IMAGE_NAMESPACE,
    MAXIMUM_ENTRIES, MAXIMUM_FILESIZE, NEWS_MAXIMUM_ENTRIES, NEWS_NAMESPACE, VIDEO_NAMESPACE,
};
use crate::document::SitemapDocument;
use crate::error::Result;
use crate::schema::{CallbackRef, Fallback, NodeRule};

/// A rule with a built-in validator and its fallback.
pub(crate) fn checked(validator: &str, fallback: Fallback) -> NodeRule {
    NodeRule::new().with_validation(CallbackRef::built_in(validator), fallback)
}

/// The supported sitemap flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// Plain Sitemaps.org `urlset`.
    SitemapsOrg,
    /// Sitemaps.org with Google limits and ping endpoint.
    Google,
    /// Google sitemap with `image:image` blocks.
    GoogleImage,
    /// Google sitemap with `video:video` blocks.
    GoogleVideo,
    /// Google news sitemap, images included.
    GoogleNews,
    /// `sitemapindex` listing other sitemaps.
    SitemapIndex,
}

impl SitemapKind {
    #[must_use]
    pub fn root_node_name(self) -> &'static str {
        match self {
            Self::SitemapIndex => "sitemapindex",
            _ => "urlset",
        }
    }

    #[must_use]
    pub fn entry_root_node_name(self) -> &'static str {
        match self {
            Self::SitemapIndex => "sitemap",
            _ => "url",
        }
    }

    #[must_use]
    pub fn maximum_entries(self) -> usize {
        match self {
            Self::GoogleNews => NEWS_MAXIMUM_ENTRIES,
            _ => MAXIMUM_ENTRIES,
        }
    }

    /// Advisory size limit of the rendered document in bytes.
    #[must_use]
    pub fn maximum_filesize(self) -> u64 {
        match self {
            Self::SitemapsOrg | Self::SitemapIndex => MAXIMUM_FILESIZE,
            Self::Google | Self::GoogleImage | Self::GoogleVideo | Self::GoogleNews => {
                GOOGLE_MAXIMUM_FILESIZE
            }
        }
    }

    /// Ping endpoints registered at construction.
    #[must_use]
    pub fn ping_urls(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::SitemapsOrg | Self::SitemapIndex => &[],
            Self::Google | Self::GoogleImage | Self::GoogleVideo | Self::GoogleNews => {
                &[(GOOGLE_PING_IDENTIFIER, GOOGLE_PING_URL)]
            }
        }
    }

    /// Rules every entry of this flavour starts from.
    #[must_use]
    pub fn base_rules(self) -> Vec<(&'static str, NodeRule)> {
        match self {
            Self::SitemapIndex => sitemaps_org::index_rules(),
            _ => sitemaps_org::url_rules(),
        }
    }

    /// Extensions applied on top of the base rules, in order.
    #[must_use]
    pub fn extensions(self) -> &'static [Extension] {
        match self {
            Self::SitemapsOrg | Self::Google | Self::SitemapIndex => &[],
            Self::GoogleImage => &[Extension::Images],
            Self::GoogleVideo => &[Extension::Videos],
            Self::GoogleNews => &[Extension::Images, Extension::News],
        }
    }
}

/// A schema extension applied to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// `image:image` blocks and the image namespace.
    Images,
    /// `video:video` blocks and the video namespace.
    Videos,
    /// `news:news` block and the news namespace.
    News,
    /// Videos only need `content_loc`; `player_loc` becomes optional.
    ContentLocOnly,
    /// Videos only need `player_loc`; `content_loc` becomes optional.
    PlayerLocOnly,
}

impl Extension {
    /// Apply this extension to a document's namespaces and schema.
    ///
    /// # Errors
    /// `ContentLocOnly` and `PlayerLocOnly` fail with `InvalidParameter`
    /// when the document has no video rules.
    pub fn apply(self, document: &mut SitemapDocument) -> Result<()> {
        match self {
            Self::Images => {
                document.add_namespace(IMAGE_NAMESPACE, "image")?;
                document.register_node(["image"], google::image_rule())
            }
            Self::Videos => {
                document.add_namespace(VIDEO_NAMESPACE, "video")?;
                document.register_node(["video"], google::video_rule())
            }
            Self::News => {
                document.add_namespace(NEWS_NAMESPACE, "news")?;
                document.register_node(["news"], news::news_rule())
            }
            Self::ContentLocOnly => document.set_node_required(["video", "player_loc"], false),
            Self::PlayerLocOnly => document.set_node_required(["video", "content_loc"], false),
        }
    }
}
