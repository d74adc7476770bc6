//! Page envelope returned by listing endpoints.
//!
//! Page arithmetic is done with 0-based page numbers. API consumers see
//! 1-based numbers; [`to_internal_page`] and [`Page::into_external`] convert
//! between the two.

use serde::Serialize;

/// Converts an externally supplied 1-based page number to a 0-based index.
///
/// Page `0` is treated like page `1`.
pub fn to_internal_page(page: usize) -> usize {
    page.saturating_sub(1)
}

/// Converts a 0-based page index back to the 1-based API numbering.
pub fn to_external_page(page: usize) -> usize {
    page + 1
}

/// Number of pages needed for `total_elements`; zero when `page_size` is zero.
pub fn total_pages(total_elements: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total_elements.div_ceil(page_size)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    /// Builds an envelope for the 0-based `page_number`.
    pub fn new(content: Vec<T>, page_number: usize, page_size: usize, total_elements: usize) -> Self {
        let total_pages = total_pages(total_elements, page_size);

        Self {
            content,
            page_number,
            page_size,
            total_elements,
            total_pages,
            first: page_number == 0,
            // `pageNumber >= totalPages - 1` without underflowing on empty results.
            last: page_number + 1 >= total_pages,
        }
    }

    /// Renumbers the envelope for API consumers.
    ///
    /// The page number becomes 1-based and `first`/`last` are recomputed
    /// from it.
    pub fn into_external(self) -> Self {
        let page_number = to_external_page(self.page_number);

        Self {
            first: page_number == 1,
            last: page_number >= self.total_pages,
            page_number,
            ..self
        }
    }
}
