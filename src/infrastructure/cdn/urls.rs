//! Media CDN URL helpers.

/// Extracts the last path segment of a URL, without query or fragment.
#[must_use]
pub fn filename_from_url(url: &str) -> Option<&str> {
    let without_query = url.split(['?', '#']).next()?;
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    let (_, path) = path.split_once('/')?;

    path.rsplit('/').next().filter(|name| !name.is_empty())
}
