//! Page requests and paged results.
//!
//! The public API counts pages from 1 but also accepts `0` as an alias for
//! the first page. Stores work with 0-based page indexes; responses always
//! report the 1-based current page.

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::error::{AppError, AppResult};

/// Store-level page request (0-based index)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub index: u64,
    pub size: u64,
}

impl PageRequest {
    /// Map a public page number and size onto a store page request.
    ///
    /// `page == 0` and `page == 1` both address the first page.
    pub fn normalize(page: i64, size: i64) -> AppResult<Self> {
        if page < 0 {
            return Err(AppError::MalformedRequest(
                "Page index must not be less than zero".to_string(),
            ));
        }
        if size < 1 {
            return Err(AppError::MalformedRequest(
                "Page size must not be less than one".to_string(),
            ));
        }
        let index = if page == 0 { 0 } else { page - 1 };
        if index.checked_mul(size).is_none() {
            return Err(AppError::MalformedRequest(format!(
                "Page {} is out of range for page size {}",
                page, size
            )));
        }
        Ok(Self { index: index as u64, size: size as u64 })
    }

    /// Number of rows preceding this page
    pub fn offset(&self) -> u64 {
        self.index.saturating_mul(self.size)
    }

    /// `LIMIT` and `OFFSET` values for a SQL page query
    pub fn limit_offset(&self) -> AppResult<(i64, i64)> {
        let out_of_range = |_| AppError::MalformedRequest("Page is out of range".to_string());
        let limit = i64::try_from(self.size).map_err(out_of_range)?;
        let offset = i64::try_from(self.offset()).map_err(out_of_range)?;
        Ok((limit, offset))
    }
}

/// Page-size policy applied on top of [`PageRequest::normalize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub default_page_size: i64,
    /// Largest accepted page size; `None` accepts any size
    pub max_page_size: Option<i64>,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 25,
            max_page_size: Some(1000),
        }
    }
}

impl PagingConfig {
    pub fn request(&self, page: i64, size: i64) -> AppResult<PageRequest> {
        if let Some(max) = self.max_page_size {
            if size > max {
                return Err(AppError::MalformedRequest(format!(
                    "Page size must not be greater than {}",
                    max
                )));
            }
        }
        PageRequest::normalize(page, size)
    }
}

/// A slice of an ordered result set plus the total match count
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, request: PageRequest) -> Self {
        Self { content, total_elements, request }
    }

    /// Cut a page out of an already ordered, complete result set
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total_elements = all.len() as u64;
        let content = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.size).unwrap_or(usize::MAX))
            .collect();
        Self { content, total_elements, request }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(self.request.size.max(1))
    }

    /// 1-based number of this page
    pub fn current_page(&self) -> u64 {
        self.request.index + 1
    }

    pub fn page_size(&self) -> u64 {
        self.request.size
    }

    /// Wrap into the response shape, listing the content under `items_key`
    pub fn keyed(self, items_key: &'static str) -> PagedResponse<T> {
        PagedResponse { items_key, page: self }
    }
}

/// Paged response serialized as
/// `{<items_key>, totalElements, totalPages, currentPage, pageSize}`
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResponse<T> {
    pub items_key: &'static str,
    pub page: Page<T>,
}

impl<T> PagedResponse<T> {
    pub fn items(&self) -> &[T] {
        &self.page.content
    }
}

impl<T: Serialize> Serialize for PagedResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry(self.items_key, &self.page.content)?;
        map.serialize_entry("totalElements", &self.page.total_elements)?;
        map.serialize_entry("totalPages", &self.page.total_pages())?;
        map.serialize_entry("currentPage", &self.page.current_page())?;
        map.serialize_entry("pageSize", &self.page.page_size())?;
        map.end()
    }
}
