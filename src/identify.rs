//! Fetch-by-identifier over list-only endpoints.
//!
//! Most Golf Genius resources can only be listed. A [`Finder`] emulates a
//! lookup by scanning pages of a listing until an item's match field equals
//! the wanted identifier. Scanning stops at the first empty page, at a short
//! page, or after `max_pages`; a miss is then reported as `NotFound`.
//!
//! Resources that split their records into an active and an archived set
//! declare an archive filter. When the caller did not pin that filter, a miss
//! over the active set is retried once with the filter set to `true`.

use async_trait::async_trait;

use crate::error::{GolfGeniusError, Result};
use crate::query::{Identified, Param, Query, PER_PAGE_KEYS};
use crate::record::Record;

/// Default number of pages scanned before giving up.
pub const DEFAULT_MAX_PAGES: u32 = 20;

/// A listing that can be asked for one page at a time.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Records of page `page` (1-indexed) for `query`.
    async fn list_page(&self, query: Query, page: u32) -> Result<Vec<Record>>;
}

/// Where a scan ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Found(Record),
    /// Gave up after the page limit.
    Exhausted,
    /// Reached the end of the listing without a match.
    NotFound,
}

/// Locates single records of one resource by scanning its listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finder {
    resource: String,
    match_fields: Vec<String>,
    per_page: Option<u32>,
    max_pages: u32,
    archive_filter: Option<String>,
}

impl Finder {
    /// Finder matching on `id`.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            match_fields: vec!["id".to_string()],
            per_page: None,
            max_pages: DEFAULT_MAX_PAGES,
            archive_filter: None,
        }
    }

    /// Fields an identifier may match, in priority order.
    #[must_use]
    pub fn match_fields(mut self, fields: &[&str]) -> Self {
        self.match_fields = fields.iter().map(|f| (*f).to_string()).collect();
        self
    }

    /// Expected page size; a shorter page is the last one.
    #[must_use]
    pub fn per_page(mut self, per_page: Option<u32>) -> Self {
        self.per_page = per_page;
        self
    }

    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Boolean filter separating archived records from active ones.
    #[must_use]
    pub fn archive_filter(mut self, filter: Option<&str>) -> Self {
        self.archive_filter = filter.map(str::to_string);
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn fields(&self) -> &[String] {
        &self.match_fields
    }

    /// Record whose match fields (first declared wins) equal `id`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty identifier, `NotFound` when no page
    /// holds a match, and any listing failure unchanged.
    pub async fn fetch_by_id(
        &self,
        source: &dyn PageSource,
        id: &dyn Identified,
        query: Query,
    ) -> Result<Record> {
        let target = id
            .identifier()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GolfGeniusError::invalid(format!("{} id must not be empty", self.resource)))?;
        self.locate(source, query, &self.match_fields, &target).await
    }

    /// Record whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `field` is not a match field of the resource,
    /// when `query` already names a match field, or when `value` is empty.
    /// Otherwise as [`Finder::fetch_by_id`].
    pub async fn fetch_by_key(
        &self,
        source: &dyn PageSource,
        field: &str,
        value: impl Into<Param> + Send,
        query: Query,
    ) -> Result<Record> {
        if !self.match_fields.iter().any(|f| f == field) {
            return Err(GolfGeniusError::invalid(format!(
                "{} cannot be looked up by '{field}' (expected one of: {})",
                self.resource,
                self.match_fields.join(", ")
            )));
        }
        if let Some(named) = self.match_fields.iter().find(|f| query.contains(f)) {
            return Err(GolfGeniusError::invalid(format!(
                "ambiguous lookup: query already names '{named}'"
            )));
        }
        let target = value.into().to_string();
        if target.is_empty() {
            return Err(GolfGeniusError::invalid(format!("{field} must not be empty")));
        }
        self.locate(source, query, std::slice::from_ref(&field.to_string()), &target)
            .await
    }

    /// Record matching the single match field named in `query`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` unless exactly one match field is present.
    /// Otherwise as [`Finder::fetch_by_key`].
    pub async fn fetch_by(&self, source: &dyn PageSource, mut query: Query) -> Result<Record> {
        let named: Vec<&String> = self.match_fields.iter().filter(|f| query.contains(f)).collect();
        let field = match named.as_slice() {
            [field] => (*field).clone(),
            [] => {
                return Err(GolfGeniusError::invalid(format!(
                    "lookup needs one of: {}",
                    self.match_fields.join(", ")
                )))
            }
            _ => {
                return Err(GolfGeniusError::invalid(format!(
                    "ambiguous lookup over {}",
                    named.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
                )))
            }
        };
        let value = query
            .remove(&field)
            .ok_or_else(|| GolfGeniusError::invalid(format!("{field} missing")))?;
        self.fetch_by_key(source, &field, value, query).await
    }

    async fn locate(
        &self,
        source: &dyn PageSource,
        query: Query,
        fields: &[String],
        target: &str,
    ) -> Result<Record> {
        if let ScanOutcome::Found(record) = self.scan(source, &query, fields, target).await? {
            return Ok(record);
        }

        if let Some(filter) = self.archive_filter.as_deref() {
            if !query.contains(filter) {
                tracing::info!(
                    resource = %self.resource,
                    id = target,
                    "not found among active records, retrying with {filter}=true"
                );
                let archived = query.with(filter, true);
                if let ScanOutcome::Found(record) =
                    self.scan(source, &archived, fields, target).await?
                {
                    return Ok(record);
                }
            }
        }

        Err(GolfGeniusError::not_found(self.resource.clone(), target))
    }

    /// Walk pages until a match, the end of the listing, or the page limit.
    ///
    /// # Errors
    ///
    /// Propagates listing failures.
    pub async fn scan(
        &self,
        source: &dyn PageSource,
        query: &Query,
        fields: &[String],
        target: &str,
    ) -> Result<ScanOutcome> {
        let per_page = PER_PAGE_KEYS
            .iter()
            .find_map(|key| query.get(key).and_then(Param::as_positive))
            .or(self.per_page);
        let mut previous: Option<(usize, Option<String>)> = None;

        for page in 1..=self.max_pages {
            let records = source.list_page(query.clone(), page).await?;
            tracing::debug!(resource = %self.resource, page, count = records.len(), "scanning");

            if records.is_empty() {
                return Ok(ScanOutcome::NotFound);
            }

            let mark = (records.len(), records.first().and_then(Record::id));
            if previous.as_ref() == Some(&mark) {
                tracing::warn!(
                    resource = %self.resource,
                    page,
                    "page repeats the previous page, stopping scan"
                );
                return Ok(ScanOutcome::NotFound);
            }

            let count = records.len();
            if let Some(found) = records
                .into_iter()
                .find(|record| matches_any(record, fields, target))
            {
                return Ok(ScanOutcome::Found(found));
            }

            if per_page.map_or(false, |size| count < size as usize) {
                return Ok(ScanOutcome::NotFound);
            }
            previous = Some(mark);
        }

        tracing::debug!(resource = %self.resource, max_pages = self.max_pages, "page limit reached");
        Ok(ScanOutcome::Exhausted)
    }
}

fn matches_any(record: &Record, fields: &[String], target: &str) -> bool {
    fields.iter().any(|field| {
        record
            .attribute(field)
            .and_then(|value| value.to_id_string())
            .map_or(false, |text| text == target)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    type Lister = dyn Fn(&Query, u32) -> Vec<serde_json::Value> + Send + Sync;

    struct FakeSource {
        requests: Mutex<Vec<(Query, u32)>>,
        respond: Box<Lister>,
    }

    impl FakeSource {
        fn new<F>(respond: F) -> Self
        where
            F: Fn(&Query, u32) -> Vec<serde_json::Value> + Send + Sync + 'static,
        {
            Self {
                requests: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            }
        }

        fn requests(&self) -> Vec<(Query, u32)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for FakeSource {
        async fn list_page(&self, query: Query, page: u32) -> Result<Vec<Record>> {
            let items = (self.respond)(&query, page);
            self.requests.lock().unwrap().push((query, page));
            items
                .into_iter()
                .map(|item| Record::from_json(item, None))
                .collect()
        }
    }

    fn events(prefix: &str, n: usize) -> Vec<serde_json::Value> {
        (1..=n)
            .map(|i| json!({"id": format!("{prefix}_{i}"), "ggid": format!("gg{prefix}{i}")}))
            .collect()
    }

    fn event_finder() -> Finder {
        Finder::new("event")
            .match_fields(&["id", "ggid"])
            .per_page(Some(25))
            .archive_filter(Some("archived"))
    }

    #[tokio::test]
    async fn test_match_on_second_page() {
        let source = FakeSource::new(|_, page| match page {
            1 => events("other", 25),
            2 => vec![
                json!({"id": "x_1"}),
                json!({"id": "event_001", "name": "Club Championship"}),
                json!({"id": "x_3"}),
            ],
            _ => Vec::new(),
        });

        let record = event_finder()
            .fetch_by_id(&source, &"event_001", Query::new())
            .await
            .unwrap();

        assert_eq!(record.get_str("name"), Some("Club Championship"));
        assert_eq!(source.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_short_page_ends_scan() {
        let source = FakeSource::new(|_, page| match page {
            1 => events("e", 25),
            2 => events("f", 3),
            _ => events("g", 25),
        });
        let finder = Finder::new("event").per_page(Some(25));

        let err = finder
            .fetch_by_id(&source, &"missing", Query::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(source.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_secondary_match_field() {
        let source = FakeSource::new(|_, page| if page == 1 { events("e", 4) } else { Vec::new() });
        let record = event_finder()
            .fetch_by_id(&source, &"gge3", Query::new())
            .await
            .unwrap();
        assert_eq!(record.id().as_deref(), Some("e_3"));
    }

    #[tokio::test]
    async fn test_archived_fallback_when_filter_unpinned() {
        let source = FakeSource::new(|query, page| {
            let archived = query.get("archived") == Some(&Param::Bool(true));
            match (archived, page) {
                (true, 1) => vec![json!({"id": "old_event", "archived": true})],
                _ => Vec::new(),
            }
        });

        let record = event_finder()
            .fetch_by_id(&source, &"old_event", Query::new())
            .await
            .unwrap();

        assert!(record.predicate("archived"));
        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].0.contains("archived"));
        assert_eq!(requests[1].0.get("archived"), Some(&Param::Bool(true)));
    }

    #[tokio::test]
    async fn test_no_fallback_when_filter_pinned() {
        let source = FakeSource::new(|_, _| Vec::new());

        let err = event_finder()
            .fetch_by_id(&source, &"old_event", Query::new().with("archived", false))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_page_limit_is_exhausted() {
        let source = FakeSource::new(|_, page| events(&format!("p{page}"), 25));
        let finder = Finder::new("event").per_page(Some(25)).max_pages(3);

        let outcome = finder
            .scan(&source, &Query::new(), finder.fields(), "nowhere")
            .await
            .unwrap();
        assert_eq!(outcome, ScanOutcome::Exhausted);
        assert_eq!(source.requests().len(), 3);

        let err = finder
            .fetch_by_id(&source, &"nowhere", Query::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_repeated_page_stops_scan() {
        let source = FakeSource::new(|_, _| events("same", 5));
        let err = Finder::new("season")
            .fetch_by_id(&source, &"absent", Query::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(source.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_by_key_argument_checks() {
        let source = FakeSource::new(|_, _| events("e", 2));
        let finder = event_finder();

        let err = finder
            .fetch_by_key(&source, "name", "Open", Query::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GolfGeniusError::InvalidArgument(_)));

        let err = finder
            .fetch_by_key(&source, "ggid", "", Query::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GolfGeniusError::InvalidArgument(_)));

        let err = finder
            .fetch_by_key(&source, "ggid", "gge1", Query::new().with("id", "e_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, GolfGeniusError::InvalidArgument(_)));

        let err = finder
            .fetch_by_id(&source, &"", Query::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GolfGeniusError::InvalidArgument(_)));

        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_by_key_matches_only_that_field() {
        // "e_2" is an id, not a ggid.
        let source = FakeSource::new(|_, page| if page == 1 { events("e", 3) } else { Vec::new() });
        let finder = Finder::new("event").match_fields(&["id", "ggid"]);

        let record = finder
            .fetch_by_key(&source, "ggid", "gge2", Query::new())
            .await
            .unwrap();
        assert_eq!(record.id().as_deref(), Some("e_2"));

        let err = finder
            .fetch_by_key(&source, "ggid", "e_2", Query::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_by_query_field() {
        let source = FakeSource::new(|_, page| if page == 1 { events("e", 3) } else { Vec::new() });
        let finder = event_finder();

        let record = finder
            .fetch_by(&source, Query::new().with("ggid", "gge1").with("season", "s1"))
            .await
            .unwrap();
        assert_eq!(record.id().as_deref(), Some("e_1"));
        let requests = source.requests();
        let (forwarded, _) = &requests[0];
        assert!(!forwarded.contains("ggid"));
        assert!(forwarded.contains("season"));

        let err = finder
            .fetch_by(&source, Query::new().with("id", "e_1").with("ggid", "gge1"))
            .await
            .unwrap_err();
        assert!(matches!(err, GolfGeniusError::InvalidArgument(_)));

        let err = finder.fetch_by(&source, Query::new()).await.unwrap_err();
        assert!(matches!(err, GolfGeniusError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_listing_errors_are_not_misreported_as_absent() {
        struct Failing;

        #[async_trait]
        impl PageSource for Failing {
            async fn list_page(&self, _query: Query, _page: u32) -> Result<Vec<Record>> {
                Err(GolfGeniusError::MalformedResponse("bad page".into()))
            }
        }

        let err = event_finder()
            .fetch_by_id(&Failing, &"event_001", Query::new())
            .await
            .unwrap_err();
        assert!(err.is_indeterminate());
    }
}
