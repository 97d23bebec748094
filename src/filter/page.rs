use serde::Deserialize;

use super::error::FilterError;

/// Fixed number of records per listing page
pub const PAGE_SIZE: u32 = 20;

/// 1-based page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
}

/// `?page=` query parameter, kept as raw text so bad input becomes a
/// validation error instead of an extractor rejection
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self { number: 1 }
    }
}

impl Page {
    pub fn new(number: u32) -> Result<Self, FilterError> {
        if number == 0 {
            return Err(FilterError::InvalidPage("page must be at least 1".to_string()));
        }
        Ok(Self { number })
    }

    /// Parse the query value; absent or blank means page 1
    pub fn parse(raw: Option<&str>) -> Result<Self, FilterError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(text) => {
                let number: u32 = text.parse().map_err(|_| {
                    FilterError::InvalidPage(format!("page must be a positive integer, got '{}'", text))
                })?;
                Self::new(number)
            }
        }
    }

    pub fn limit(&self) -> u32 {
        PAGE_SIZE
    }

    /// Records skipped before this page: `(page - 1) * PAGE_SIZE`
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(PAGE_SIZE)
    }
}

impl TryFrom<PageQuery> for Page {
    type Error = FilterError;

    fn try_from(query: PageQuery) -> Result<Self, Self::Error> {
        Page::parse(query.page.as_deref())
    }
}
