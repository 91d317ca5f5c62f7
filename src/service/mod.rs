//! RowService: generic row CRUD with typed decoding of request fields.

mod crud;
mod decode;
pub use crud::RowService;
pub use decode::{DecodedRow, RawFields, RowDecoder};
