//! Blob path resolution from stored image URLs.

/// Outcome of splitting an image URL on the container marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedPath<'a> {
    /// The text after the last `{marker}/`.
    InContainer(&'a str),
    /// The marker was absent; the input is returned untouched.
    Unchanged(&'a str),
}

impl<'a> ResolvedPath<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            ResolvedPath::InContainer(path) | ResolvedPath::Unchanged(path) => path,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolvedPath::Unchanged(_))
    }
}

/// Derive a blob path from `image_url`.
///
/// Returns the substring following the last occurrence of
/// `container_marker + "/"`, or the whole input when the marker is absent.
pub fn resolve_image_path<'a>(image_url: &'a str, container_marker: &str) -> ResolvedPath<'a> {
    let needle = format!("{}/", container_marker);
    match image_url.rfind(&needle) {
        Some(idx) => ResolvedPath::InContainer(&image_url[idx + needle.len()..]),
        None => ResolvedPath::Unchanged(image_url),
    }
}
