use serde::Deserialize;

use super::ApiError;
use crate::config::FeedConfig;

/// `?page=&per_page=` on feed endpoints. Both are optional; `page` is 1-indexed.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    /// Applies defaults and the configured upper bound. Lower bounds are left
    /// to the feed service, which rejects `page < 1` and `per_page < 1`.
    pub fn resolve(&self, feed: &FeedConfig) -> Result<(i64, i64), ApiError> {
        let page = self.page.unwrap_or(1);
        let per_page = self
            .per_page
            .unwrap_or_else(|| i64::from(feed.posts_per_page));

        let max = i64::from(feed.max_posts_per_page);
        if per_page > max {
            return Err(ApiError::validation(format!(
                "Invalid per_page: {}. Must be at most {}",
                per_page, max
            )));
        }

        Ok((page, per_page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let feed = FeedConfig::default();
        let (page, per_page) = PageQuery::default().resolve(&feed).unwrap();
        assert_eq!(page, 1);
        assert_eq!(per_page, 25);
    }

    #[test]
    fn test_per_page_above_max_is_rejected() {
        let feed = FeedConfig::default();
        let query = PageQuery {
            page: Some(1),
            per_page: Some(101),
        };
        assert!(query.resolve(&feed).is_err());
    }

    #[test]
    fn test_lower_bounds_pass_through() {
        let feed = FeedConfig::default();
        let query = PageQuery {
            page: Some(0),
            per_page: Some(0),
        };
        assert_eq!(query.resolve(&feed).unwrap(), (0, 0));
    }
}
