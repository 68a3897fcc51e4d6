// src/dtos/pager.rs
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_INDEX: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 5;

fn default_page_index() -> u32 {
    DEFAULT_PAGE_INDEX
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Query-string binding for paged listings. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    #[serde(default = "default_page_index")]
    pub page_index: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub search: Option<String>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE_INDEX,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl Params {
    /// Clamps `page_size` into `[1, max_page_size]`, treats page 0 as the
    /// first page and lower-cases the search term (blank means no filter).
    pub fn normalized(self, max_page_size: u32) -> Self {
        let search = self
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Self {
            page_index: self.page_index.max(1),
            page_size: self.page_size.clamp(1, max_page_size.max(1)),
            search,
        }
    }
}

/// Rows to skip before `page_index` (1-based; 0 behaves like 1).
pub fn page_offset(page_index: u32, page_size: u32) -> i64 {
    i64::from(page_index.saturating_sub(1)) * i64::from(page_size)
}

/// One page of results plus the metadata needed to walk the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager<T> {
    pub search: Option<String>,
    pub page_index: u32,
    pub page_size: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub registros: Vec<T>,
}

impl<T> Pager<T> {
    /// No clamping of `page_index`: a page past the end simply has no rows.
    pub fn new(
        page_index: u32,
        page_size: u32,
        total: i64,
        registros: Vec<T>,
        search: Option<String>,
    ) -> Self {
        let total_pages = total_pages(total, page_size);
        Self {
            search,
            page_index,
            page_size,
            total,
            total_pages,
            has_previous_page: page_index > 1,
            has_next_page: i64::from(page_index) < total_pages,
            registros,
        }
    }
}

fn total_pages(total: i64, page_size: u32) -> i64 {
    if total <= 0 || page_size == 0 {
        return 0;
    }
    let size = i64::from(page_size);
    (total + size - 1) / size
}
