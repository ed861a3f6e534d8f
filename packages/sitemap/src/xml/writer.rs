//! Serialization of [`XmlDocument`]s with quick-xml.

use std::io::Write;

use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::element::{XmlDocument, XmlElement};
use crate::error::{Result, SitemapError};

/// Serialize a document.
///
/// Compact output puts the declaration, the stylesheet instruction and the
/// root element on their own lines. `pretty` indents nested elements by two
/// spaces.
///
/// # Examples
/// ```
/// use regelrecht_sitemap::xml::{write_document, XmlDocument, XmlElement};
///
/// let document = XmlDocument {
///     version: "1.0".into(),
///     encoding: "UTF-8".into(),
///     stylesheet: None,
///     root: XmlElement::new("urlset")
///         .with_child(XmlElement::new("url").with_child(XmlElement::new("loc").with_text("a&b"))),
/// };
/// assert_eq!(
///     write_document(&document, false).unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset><url><loc>a&amp;b</loc></url></urlset>\n"
/// );
/// ```
pub fn write_document(document: &XmlDocument, pretty: bool) -> Result<String> {
    let mut writer = if pretty {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new(
            document.version.as_str(),
            Some(document.encoding.as_str()),
            None,
        )),
    )?;
    line_break(&mut writer, pretty);

    if let Some(href) = &document.stylesheet {
        let instruction = format!("xml-stylesheet type=\"text/xsl\" href=\"{}\"", escape(href.as_str()));
        emit(&mut writer, Event::PI(BytesPI::new(instruction)))?;
        line_break(&mut writer, pretty);
    }

    write_element(&mut writer, &document.root)?;
    writer.get_mut().push(b'\n');

    String::from_utf8(writer.into_inner()).map_err(|e| SitemapError::XmlWrite(e.to_string()))
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());
    if element.children.is_empty() && text.is_none() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    if let Some(text) = text {
        emit(writer, Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SitemapError::XmlWrite(e.to_string()))
}

/// Compact output still separates the prolog from the root element.
fn line_break(writer: &mut Writer<Vec<u8>>, pretty: bool) {
    if !pretty {
        writer.get_mut().push(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document(root: XmlElement) -> XmlDocument {
        XmlDocument {
            version: "1.0".to_string(),
            encoding: "UTF-8".to_string(),
            stylesheet: None,
            root,
        }
    }

    #[test]
    fn test_empty_root_and_attributes() {
        let doc = document(
            XmlElement::new("urlset")
                .with_attribute("xmlns", "http://www.sitemaps.org/schemas/sitemap/0.9"),
        );
        assert_eq!(
            write_document(&doc, false).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"/>\n"
        );
    }

    #[test]
    fn test_stylesheet_instruction() {
        let mut doc = document(XmlElement::new("urlset"));
        doc.stylesheet = Some("/sitemap.xsl".to_string());

        let xml = write_document(&doc, false).unwrap();
        assert!(xml.contains(
            "?>\n<?xml-stylesheet type=\"text/xsl\" href=\"/sitemap.xsl\"?>\n<urlset/>"
        ));
    }

    #[test]
    fn test_pretty_output_indents() {
        let doc = document(
            XmlElement::new("urlset").with_child(
                XmlElement::new("url").with_child(XmlElement::new("loc").with_text("x")),
            ),
        );
        let xml = write_document(&doc, true).unwrap();

        assert!(xml.contains("\n<urlset>\n  <url>\n    <loc>x</loc>\n  </url>\n</urlset>"));
    }

    #[test]
    fn test_output_parses_back() {
        let doc = document(
            XmlElement::new("urlset").with_child(
                XmlElement::new("url")
                    .with_child(XmlElement::new("loc").with_text("http://e.com/?a=1&b=<2>")),
            ),
        );
        let xml = write_document(&doc, false).unwrap();
        let parsed = roxmltree::Document::parse(&xml).unwrap();

        let loc = parsed
            .descendants()
            .find(|n| n.has_tag_name("loc"))
            .and_then(|n| n.text());
        assert_eq!(loc, Some("http://e.com/?a=1&b=<2>"));
    }
}
