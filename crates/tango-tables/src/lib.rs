pub mod builder;
pub mod store;
pub mod types;

pub use builder::{build_display_table, build_search_index};
pub use store::{StoreError, TableStore};
pub use types::{DisplayRow, DisplayTable, SearchIndex, SearchIndexRow};
