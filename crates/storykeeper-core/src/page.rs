//! Page arithmetic for listings.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalised page request.
///
/// `page` is 1-based on the wire; the zero-based index floors at 0 and the
/// size is clamped to `[1, MAX_PAGE_SIZE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  index: u32,
  size:  u32,
}

impl PageRequest {
  pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
    let index = page
      .unwrap_or(1)
      .saturating_sub(1)
      .clamp(0, i64::from(u32::MAX)) as u32;
    let size = limit
      .unwrap_or(i64::from(DEFAULT_PAGE_SIZE))
      .clamp(1, i64::from(MAX_PAGE_SIZE)) as u32;
    Self { index, size }
  }

  /// The 1-based page number.
  pub fn page(&self) -> u32 { self.index + 1 }

  pub fn size(&self) -> u32 { self.size }

  pub fn offset(&self) -> u64 { u64::from(self.index) * u64::from(self.size) }
}

impl Default for PageRequest {
  fn default() -> Self { Self::new(None, None) }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub items:       Vec<T>,
  pub total:       u64,
  pub page:        u32,
  pub limit:       u32,
  pub total_pages: u64,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
    Self {
      items,
      total,
      page: request.page(),
      limit: request.size(),
      total_pages: total.div_ceil(u64::from(request.size())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn second_page_of_twenty() {
    let req = PageRequest::new(Some(2), Some(20));
    assert_eq!(req.offset(), 20);
    let page = Page::new(vec![(); 20], 55, req);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 2);
    assert_eq!(page.limit, 20);
  }

  #[test]
  fn page_index_floors_at_zero() {
    assert_eq!(PageRequest::new(Some(0), None).offset(), 0);
    assert_eq!(PageRequest::new(Some(-5), None).page(), 1);
  }

  #[test]
  fn size_is_clamped() {
    assert_eq!(PageRequest::new(None, Some(0)).size(), 1);
    assert_eq!(PageRequest::new(None, Some(-3)).size(), 1);
    assert_eq!(PageRequest::new(None, Some(500)).size(), MAX_PAGE_SIZE);
    assert_eq!(PageRequest::default().size(), DEFAULT_PAGE_SIZE);
  }

  #[test]
  fn empty_result_has_zero_pages() {
    let page = Page::<()>::new(vec![], 0, PageRequest::default());
    assert_eq!(page.total_pages, 0);
  }
}
