use crate::domain::FetchedItem;

/// Maximum number of items kept per site
pub const CACHE_LIMIT: usize = 5;

/// Put `item` at the front of `existing`, dropping any entry with the same
/// link and keeping at most `CACHE_LIMIT` entries.
pub fn update_cache(existing: &[FetchedItem], item: FetchedItem) -> Vec<FetchedItem> {
    std::iter::once(item.clone())
        .chain(existing.iter().filter(|c| c.link != item.link).cloned())
        .take(CACHE_LIMIT)
        .collect()
}
