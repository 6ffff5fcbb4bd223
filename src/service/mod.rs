pub mod blob_store;
pub mod catalog;
pub mod error;
pub mod image_pipeline;
pub mod media;
pub mod search;
pub mod search_query;

#[cfg(test)]
pub mod fixtures;
