//! Domain logic for business request search

pub mod requests;

pub use requests::BrSearchService;
