use serde::{Deserialize, Serialize};

/// Pagination envelope shared by every paginated endpoint.
///
/// Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

fn first_page() -> u32 {
    1
}

impl PageMeta {
    /// Metadata for a response that carried the whole list at once.
    pub fn single_page(page: u32, size: u32, total_elements: u64) -> Self {
        Self {
            current_page: page,
            total_pages: 1,
            total_elements,
            size,
            first: page == 1,
            last: true,
        }
    }
}

/// A normalised page of items. Each fetch replaces the displayed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paged<T> {
    pub fn empty(page: u32, size: u32) -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta::single_page(page, size, 0),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
