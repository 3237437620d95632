//! CLI subcommand implementations.

pub mod bills;
pub mod check;
pub mod legislator;
pub mod nominations;
pub mod summary;
pub mod votes;

/// Slice one page out of `items`. Returns the page and the total page count.
pub fn paginate<T>(items: Vec<T>, page: i64, page_size: i64) -> (Vec<T>, usize) {
    let size = page_size.max(1) as usize;
    let total_pages = items.len().div_ceil(size).max(1);
    let start = (page.max(1) as usize - 1).saturating_mul(size);
    let page_items = items.into_iter().skip(start).take(size).collect();
    (page_items, total_pages)
}

/// One-based rank of the first row on `page`.
pub fn first_rank(page: i64, page_size: i64) -> usize {
    let skipped = (page.max(1) - 1).saturating_mul(page_size.max(1));
    usize::try_from(skipped).unwrap_or(usize::MAX).saturating_add(1)
}
