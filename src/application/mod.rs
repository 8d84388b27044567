//! Application services: content reads, gallery accessors and image URLs.

pub mod catalog;
pub mod content;
pub mod error;
pub mod images;
pub mod repos;
