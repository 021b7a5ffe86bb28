use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LimitQueryDto {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQueryDto {
    pub q: Option<String>,
}

/// Dashboard counters for the admin landing page.
#[derive(Debug, Serialize, Default)]
pub struct StatsDto {
    pub total: i64,
    pub published: i64,
    pub drafts: i64,
    pub featured: i64,
}
