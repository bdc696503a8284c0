//! File-backed storage: one JSON document holding a `simulations` array of
//! `{principal, rate, years, date}` records plus a flat map of settings.

mod document;
pub mod factory;
pub mod repository;

pub use factory::JsonRepositoryFactory;
pub use repository::JsonFileRepository;
