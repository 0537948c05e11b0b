//! Core types and read operations for the SDWIS data browser.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::SdwisStore`]; the search, county and
//! detail operations are written against that trait alone.

pub mod county;
pub mod detail;
pub mod entity;
pub mod error;
pub mod resolver;
pub mod search;
pub mod store;
pub mod system;

pub use error::{Error, Result};
