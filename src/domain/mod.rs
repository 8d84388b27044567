//! Domain rules over Cockpit content. Pure functions, no I/O.

pub mod achievements;
pub mod artists;
pub mod artworks;
pub mod error;
pub mod images;
pub mod locale;

pub use ikono_cms_types as entities;
