//! Sorting and pagination of result lists

use super::types::SearchResult;

/// Stable ascending sort by title, comparing bytes
pub fn sort_by_title(results: &mut [SearchResult]) {
    results.sort_by(|a, b| a.title.as_bytes().cmp(b.title.as_bytes()));
}

/// Bounds of the 1-based `page` of size `limit` within `len` items
///
/// The window is `[(page-1)*limit, page*limit)` clamped to `[0, len]`.
pub fn page_bounds(len: usize, page: u32, limit: u32) -> (usize, usize) {
    if page == 0 || limit == 0 {
        return (0, 0);
    }
    let limit = limit as usize;
    let low = (page as usize - 1).saturating_mul(limit);
    if low >= len {
        return (len, len);
    }
    let high = low.saturating_add(limit).min(len);
    (low, high)
}

/// Keep only the requested page of `items`
pub fn paginate<T>(mut items: Vec<T>, page: u32, limit: u32) -> Vec<T> {
    let (low, high) = page_bounds(items.len(), page, limit);
    items.truncate(high);
    items.drain(..low);
    items
}
