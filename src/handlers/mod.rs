//! HTTP handlers for row CRUD.

pub mod rows;
