pub mod entry;
pub mod text;

pub use entry::{Entry, EntryId, USE_KANA_MARKER, push_unique};
pub use text::{capitalize, join_forms, normalize_query};
