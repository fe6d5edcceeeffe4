//! harsh_core - functional core of the harsh_engine data mapper.
//!
//! Pure domain types and contracts with no I/O:
//!
//! - [`entity`]: the `Entity` capability, the `User` entity and its schema
//! - [`query`]: the `QueryArgsBag` filter/sort parser
//! - [`mapper`]: the `DataMapper` contract, `ModelState` and the error taxonomy
//! - [`seed`]: reproducible dummy data for bootstrapping a store

pub mod entity;
pub mod mapper;
pub mod query;
pub mod seed;
