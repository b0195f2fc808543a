use serde::Deserialize;

const DEFAULT_SKIP: u32 = 0;
const DEFAULT_LIMIT: u32 = 100;

/// Window over the subscribers ordered by id. Both bounds come from the query string
/// and fall back to the defaults when missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_skip")]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_skip() -> u32 {
    DEFAULT_SKIP
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Pagination {
    pub fn new(skip: u32, limit: u32) -> Pagination {
        Pagination { skip, limit }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.skip)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(DEFAULT_SKIP, DEFAULT_LIMIT)
    }
}
