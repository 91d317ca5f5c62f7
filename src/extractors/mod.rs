//! Request extractors.

mod row_data;
mod row_path;
pub use row_data::RowData;
pub use row_path::{parse_id, RowPath, TablePath};
