use super::types::PaginationMeta;

/// One slice of a ranked sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta {
            total: self.total,
            limit: self.limit,
            offset: self.offset,
            has_next: self.has_next,
        }
    }
}

/// Returns `ranked[offset..offset + limit]`.
///
/// `limit` is clamped to `[1, max_limit]` again here; an offset past the end
/// yields an empty page.
pub fn paginate<T>(ranked: Vec<T>, limit: usize, offset: usize, max_limit: usize) -> Page<T> {
    let limit = limit.clamp(1, max_limit.max(1));
    let total = ranked.len();
    let items: Vec<T> = ranked.into_iter().skip(offset).take(limit).collect();

    Page {
        items,
        total,
        limit,
        offset,
        has_next: offset.saturating_add(limit) < total,
    }
}
