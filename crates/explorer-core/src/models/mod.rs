//! Data model shared by the loader, filter and image resolver.

mod catalog;
mod image;
mod record;

pub use catalog::Catalog;
pub use image::{ImageBytes, ImageFormat};
pub use record::{Entity, FieldValue, Record, RecordId, RequiredField};
