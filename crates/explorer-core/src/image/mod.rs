//! Image path resolution and fetching.

mod path;
mod resolver;

pub use path::{resolve_image_path, ResolvedPath};
pub use resolver::ImageResolver;
