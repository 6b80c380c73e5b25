//! Value objects for the domain layer

mod selector;
mod version;

pub use selector::{VersionSelector, decode_selectors, encode_selectors};
pub use version::UNVERSIONED;
