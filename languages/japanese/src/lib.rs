pub mod error;
pub mod loader;
pub mod raw;

pub use error::LoadError;
pub use loader::{JMdictLoader, parse_document};
pub use raw::{RawEntry, RawKanji, RawReading, RawSense};
