//! Minimal XML element tree and its serializer.
//!
//! The renderer builds an [`XmlElement`] tree; [`write_document`] turns it
//! into text with quick-xml, escaping text and attribute values once.

mod element;
mod writer;

pub use element::{XmlDocument, XmlElement};
pub use writer::write_document;
