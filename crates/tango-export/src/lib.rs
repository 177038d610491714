pub mod writer;

pub use writer::{ExportError, export};
