//! Listing filter and pagination.

use orla_core::UserId;

use crate::event::Event;

/// Hard cap on page size. Also the default when the caller sends none.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Conjunctive filter over the event listing.
///
/// Every present field narrows the result; results are always ordered by
/// event date descending regardless of the filters. An empty result is not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    /// Rows to skip before the page starts.
    pub skip: i64,
    /// Requested page size; clamped to [`MAX_PAGE_SIZE`] by the stores.
    pub limit: i64,
    /// Case-insensitive substring match against the title.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact creator match (the "my events" view).
    pub creator: Option<UserId>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: MAX_PAGE_SIZE,
            search: None,
            category: None,
            creator: None,
        }
    }
}

impl EventFilter {
    /// Skip, with negative values treated as zero.
    pub fn skip(&self) -> i64 {
        self.skip.max(0)
    }

    /// Effective page size: non-negative and never above [`MAX_PAGE_SIZE`].
    pub fn limit(&self) -> i64 {
        self.limit.clamp(0, MAX_PAGE_SIZE)
    }

    /// Whether `event` satisfies every present filter.
    ///
    /// This is the reference semantics; the Postgres store expresses the
    /// same predicate in SQL.
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(search) = &self.search {
            if !event
                .title
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if event.category != *category {
                return false;
            }
        }
        if let Some(creator) = self.creator {
            if event.creator != creator {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orla_core::EventId;

    fn event(title: &str, category: &str, creator: i64) -> Event {
        Event {
            id: EventId::new(1),
            title: title.to_string(),
            description: None,
            date: Utc::now(),
            location: "Centro".to_string(),
            category: category.to_string(),
            image: None,
            creator: UserId::new(creator),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let filter = EventFilter {
            search: Some("praia".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&event("Praia do Sol", "General", 1)));
        assert!(filter.matches(&event("Limpeza da praia", "General", 1)));
        assert!(!filter.matches(&event("Trilha na serra", "General", 1)));
    }

    #[test]
    fn category_is_exact_match_only() {
        let filter = EventFilter {
            category: Some("Music".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&event("Show", "Music", 1)));
        assert!(!filter.matches(&event("Show", "Musical", 1)));
        assert!(!filter.matches(&event("Show", "music", 1)));
    }

    #[test]
    fn filters_are_conjunctive() {
        let filter = EventFilter {
            search: Some("festival".to_string()),
            category: Some("Food".to_string()),
            creator: Some(UserId::new(2)),
            ..Default::default()
        };
        assert!(filter.matches(&event("Festival do Camarão", "Food", 2)));
        assert!(!filter.matches(&event("Festival do Camarão", "Food", 3)));
        assert!(!filter.matches(&event("Festival do Camarão", "Music", 2)));
        assert!(!filter.matches(&event("Feira", "Food", 2)));
    }

    #[test]
    fn limit_is_clamped() {
        let filter = EventFilter {
            limit: 10_000,
            ..Default::default()
        };
        assert_eq!(filter.limit(), MAX_PAGE_SIZE);

        let filter = EventFilter {
            limit: -3,
            skip: -10,
            ..Default::default()
        };
        assert_eq!(filter.limit(), 0);
        assert_eq!(filter.skip(), 0);
    }
}
