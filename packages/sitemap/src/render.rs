//! Rendering of processed entries into XML elements.

use crate::types::{RenderNode, RenderTree};
use crate::xml::XmlElement;

/// Turns render trees into XML elements.
///
/// Members of a repeated group become sibling elements that reuse their
/// field's tag name. A field holding only repeated members produces just
/// the siblings, so three images yield three `<image:image>` elements.
#[derive(Debug, Clone)]
pub struct TreeRenderer {
    entry_root: String,
}

impl TreeRenderer {
    /// Create a renderer wrapping each entry in `entry_root` (`url`, `sitemap`).
    #[must_use]
    pub fn new(entry_root: impl Into<String>) -> Self {
        Self {
            entry_root: entry_root.into(),
        }
    }

    #[must_use]
    pub fn entry_root(&self) -> &str {
        &self.entry_root
    }

    /// Render one accepted entry.
    #[must_use]
    pub fn render_entry(&self, entry: &RenderTree) -> XmlElement {
        let mut element = XmlElement::new(self.entry_root.as_str());
        append_tree(&mut element, entry);
        element
    }

    /// Render all entries under `root`.
    #[must_use]
    pub fn render_into(&self, mut root: XmlElement, entries: &[RenderTree]) -> XmlElement {
        root.children
            .extend(entries.iter().map(|entry| self.render_entry(entry)));
        root
    }
}

fn append_tree(parent: &mut XmlElement, tree: &RenderTree) {
    for (tag, node) in tree.iter() {
        parent.children.extend(render_node(tag, node));
    }
}

/// Elements produced by one field, in document order.
fn render_node(tag: &str, node: &RenderNode) -> Vec<XmlElement> {
    match node {
        RenderNode::Text(text) => vec![XmlElement::new(tag).with_text(text.as_str())],
        RenderNode::Nested { children, repeated } => {
            let mut elements = Vec::with_capacity(repeated.len() + 1);
            if !children.is_empty() || repeated.is_empty() {
                let mut element = XmlElement::new(tag);
                append_tree(&mut element, children);
                elements.push(element);
            }
            for member in repeated {
                let mut sibling = XmlElement::new(tag);
                append_tree(&mut sibling, member);
                elements.push(sibling);
            }
            elements
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_tree(fields: &[(&str, &str)]) -> RenderTree {
        let mut tree = RenderTree::new();
        for (tag, text) in fields {
            tree.insert(*tag, RenderNode::Text((*text).to_string()));
        }
        tree
    }

    fn names(element: &XmlElement) -> Vec<&str> {
        element.children.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_scalar_fields_become_children() {
        let renderer = TreeRenderer::new("url");
        let entry = text_tree(&[("loc", "http://example.com/a"), ("priority", "0.8")]);

        let url = renderer.render_entry(&entry);

        assert_eq!(url.name, "url");
        assert_eq!(names(&url), vec!["loc", "priority"]);
        assert_eq!(url.children[1].text.as_deref(), Some("0.8"));
    }

    #[test]
    fn test_repeated_members_become_siblings() {
        let renderer = TreeRenderer::new("url");
        let mut entry = text_tree(&[("loc", "http://example.com/a")]);
        entry.insert(
            "image:image",
            RenderNode::Nested {
                children: RenderTree::new(),
                repeated: vec![
                    text_tree(&[("image:loc", "1.jpg")]),
                    text_tree(&[("image:loc", "2.jpg")]),
                    text_tree(&[("image:loc", "3.jpg")]),
                ],
            },
        );

        let url = renderer.render_entry(&entry);

        assert_eq!(names(&url), vec!["loc", "image:image", "image:image", "image:image"]);
        assert_eq!(
            url.children[3].child("image:loc").and_then(|e| e.text.as_deref()),
            Some("3.jpg")
        );
    }

    #[test]
    fn test_ordinary_children_precede_repeated_members() {
        let renderer = TreeRenderer::new("url");
        let mut entry = RenderTree::new();
        entry.insert(
            "video:video",
            RenderNode::Nested {
                children: text_tree(&[("video:title", "main")]),
                repeated: vec![text_tree(&[("video:title", "extra")])],
            },
        );

        let url = renderer.render_entry(&entry);

        assert_eq!(names(&url), vec!["video:video", "video:video"]);
        assert_eq!(
            url.children[0].child("video:title").and_then(|e| e.text.as_deref()),
            Some("main")
        );
    }

    #[test]
    fn test_empty_nested_renders_single_element() {
        let renderer = TreeRenderer::new("sitemap");
        let mut entry = RenderTree::new();
        entry.insert(
            "news:news",
            RenderNode::Nested {
                children: RenderTree::new(),
                repeated: Vec::new(),
            },
        );

        let sitemap = renderer.render_entry(&entry);
        assert_eq!(names(&sitemap), vec!["news:news"]);
        assert!(sitemap.children[0].children.is_empty());
    }

    #[test]
    fn test_render_into_keeps_entry_order() {
        let renderer = TreeRenderer::new("url");
        let entries = vec![text_tree(&[("loc", "a")]), text_tree(&[("loc", "b")])];

        let root = renderer.render_into(XmlElement::new("urlset"), &entries);

        let locs: Vec<_> = root
            .children
            .iter()
            .filter_map(|u| u.child("loc").and_then(|l| l.text.as_deref()))
            .collect();
        assert_eq!(locs, vec!["a", "b"]);
    }
}
