//! XML helpers shared by every part reader.

pub mod element;

pub use element::{Descendants, XmlElement};
