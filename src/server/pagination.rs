use serde::Deserialize;

use super::deserializers::deserialize_page;

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_page")]
    page: Option<i64>,
}

impl PageQuery {
    /// 1-based page number, defaulting to the first page.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

/// Returns the `page`-th window of `QUESTIONS_PER_PAGE` items. Pages below 1
/// or past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: i64) -> Vec<T> {
    let Some(start) = usize::try_from(page)
        .ok()
        .and_then(|page| page.checked_sub(1))
        .and_then(|page| page.checked_mul(QUESTIONS_PER_PAGE))
    else {
        return Vec::new();
    };
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}
