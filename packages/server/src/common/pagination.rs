//! Offset pagination as the SKTAI listing APIs expose it (1-based page + size).

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub search: Option<String>,
}

/// Validated pagination arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPage {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
}

impl PageRequest {
    pub fn validate(&self) -> Result<ValidatedPage> {
        let page = self.page.unwrap_or(1);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            bail!("page must be at least 1");
        }
        if size == 0 || size > MAX_PAGE_SIZE {
            bail!("size must be between 1 and {}", MAX_PAGE_SIZE);
        }

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ValidatedPage { page, size, search })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}
