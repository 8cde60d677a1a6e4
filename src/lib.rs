//! Local storage for captured photos.
//!
//! Photos pasted or dropped into the gallery are kept in a SQLite database,
//! together with a name, an optional caption and an optional group. Reads and
//! writes go through [`data::PhotoStore`], and [`gallery::Gallery`] holds the
//! state a gallery view is drawn from.

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod gallery;
pub mod telemetry;

pub use config::{Settings, StoreConfig};
pub use data::{NewPhoto, PhotoStore, PhotoUpdate};
pub use entity::photo::Model as PhotoRecord;
pub use error::StoreError;
