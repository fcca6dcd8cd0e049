//! Pagination for Golf Genius list endpoints.
//!
//! List endpoints take a 1-indexed `page` parameter and return no totals, so
//! the end of a listing is detected from the pages themselves: an empty page,
//! a short page (when the page size is known), or a page identical to the one
//! before it. The last rule protects against endpoints that ignore `page`
//! and would otherwise be fetched forever.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{GolfGeniusError, Result};
use crate::query::{Query, Reserved, PAGE_KEY};
use crate::record::{json_type_name, Record};
use crate::transport::{effective_credential, Method, Transport};

/// Maximum pages to fetch (safety limit).
pub const MAX_PAGES: u32 = 1000;

/// Key many endpoints use for their result array.
const DATA_KEY: &str = "data";

/// Raw item as decoded from a response, after envelope unwrapping.
pub type RawItem = Map<String, JsonValue>;

/// A page of results from the Golf Genius API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Expected number of items per page, when known.
    pub per_page: Option<u32>,
    /// Whether there may be more pages.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, per_page: Option<u32>) -> Self {
        let has_more = match per_page {
            Some(size) => items.len() >= size as usize,
            None => !items.is_empty(),
        };
        Self {
            items,
            page,
            per_page,
            has_more,
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            has_more: self.has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// How a response wraps its payload.
///
/// Responses come as a bare array, an object holding the array under
/// `"data"` or a plural key, or a single object. Items may themselves be
/// wrapped under a singular key, e.g. `[{"event": {...}}]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    /// Key holding the result array, when it is not `data` or the path's
    /// last segment.
    pub list_key: Option<String>,
    /// Key wrapping each item.
    pub item_key: Option<String>,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn list_key(mut self, key: impl Into<String>) -> Self {
        self.list_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn item_key(mut self, key: impl Into<String>) -> Self {
        self.item_key = Some(key.into());
        self
    }

    /// Extract the items of a response body fetched from `path`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when the body, or one of its items, is not
    /// shaped as an object or array of objects.
    pub fn extract(&self, path: &str, body: JsonValue) -> Result<Vec<RawItem>> {
        let items = match body {
            JsonValue::Array(items) => items,
            JsonValue::Object(map) => self.items_from_object(path, map)?,
            other => {
                return Err(GolfGeniusError::MalformedResponse(format!(
                    "{path}: expected an array or object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        items
            .into_iter()
            .map(|item| self.unwrap_item(path, item))
            .collect()
    }

    fn items_from_object(&self, path: &str, mut map: RawItem) -> Result<Vec<JsonValue>> {
        let declared = self.list_key.as_deref().into_iter().chain([DATA_KEY]);
        for key in declared {
            let take = match map.get(key) {
                Some(JsonValue::Array(_)) => true,
                Some(JsonValue::Null) => map.len() == 1,
                _ => false,
            };
            if take {
                return Ok(match map.remove(key) {
                    Some(JsonValue::Array(items)) => items,
                    _ => Vec::new(),
                });
            }
        }

        if let Some(plural) = plural_key(path) {
            if matches!(map.get(plural), Some(JsonValue::Array(_))) {
                if let Some(JsonValue::Array(items)) = map.remove(plural) {
                    return Ok(items);
                }
            }
        }

        if map.is_empty() {
            return Ok(Vec::new());
        }
        if map.len() == 1 && map.values().all(JsonValue::is_array) {
            if let Some((_, JsonValue::Array(items))) = map.into_iter().next() {
                return Ok(items);
            }
            return Ok(Vec::new());
        }
        Ok(vec![JsonValue::Object(map)])
    }

    fn unwrap_item(&self, path: &str, item: JsonValue) -> Result<RawItem> {
        let mut map = match item {
            JsonValue::Object(map) => map,
            other => {
                return Err(GolfGeniusError::MalformedResponse(format!(
                    "{path}: expected list items to be objects, got {}",
                    json_type_name(&other)
                )))
            }
        };

        match self.item_key.as_deref() {
            Some(key) => {
                if matches!(map.get(key), Some(JsonValue::Object(_))) && map.len() == 1 {
                    if let Some(JsonValue::Object(inner)) = map.remove(key) {
                        return Ok(inner);
                    }
                }
                Ok(map)
            }
            None => {
                if map.len() == 1 && map.values().all(JsonValue::is_object) {
                    if let Some((_, JsonValue::Object(inner))) = map.into_iter().next() {
                        return Ok(inner);
                    }
                    return Ok(Map::new());
                }
                Ok(map)
            }
        }
    }
}

/// Last path segment, the conventional name of a listing's result array.
fn plural_key(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(|segment| segment.trim_end_matches(".json"))
        .filter(|segment| !segment.is_empty())
}

/// What identifies a page for the repeated-page check.
#[derive(Debug, Clone, PartialEq)]
struct PageMark {
    count: usize,
    first: JsonValue,
}

impl PageMark {
    fn of(items: &[RawItem]) -> Self {
        let first = items
            .first()
            .map(|item| match item.get("id") {
                Some(id) if !id.is_null() => id.clone(),
                _ => JsonValue::Object(item.clone()),
            })
            .unwrap_or(JsonValue::Null);
        Self {
            count: items.len(),
            first,
        }
    }
}

/// Issues page requests for one listing path.
#[derive(Clone)]
pub struct Paginator<'a> {
    transport: &'a dyn Transport,
    path: String,
    envelope: Envelope,
    credential: Option<String>,
}

impl std::fmt::Debug for Paginator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("path", &self.path)
            .field("envelope", &self.envelope)
            .finish_non_exhaustive()
    }
}

impl<'a> Paginator<'a> {
    /// Paginator for `path` (starting with `/`, without the credential).
    pub fn new(transport: &'a dyn Transport, path: impl Into<String>) -> Self {
        Self {
            transport,
            path: path.into(),
            envelope: Envelope::default(),
            credential: None,
        }
    }

    #[must_use]
    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Credential to use when the query carries no override.
    #[must_use]
    pub fn credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn resolve_credential(&self, reserved: &Reserved) -> Option<String> {
        effective_credential(
            self.transport,
            reserved
                .credential
                .as_deref()
                .or(self.credential.as_deref()),
        )
    }

    /// One transport call for one page, returning unwrapped raw items.
    pub(crate) async fn fetch_raw(
        &self,
        filters: &Query,
        page: Option<u32>,
        credential: Option<&str>,
    ) -> Result<Vec<RawItem>> {
        let mut params = filters.to_params();
        if let Some(page) = page {
            params.insert(PAGE_KEY.to_string(), page.to_string());
        }

        let body = self
            .transport
            .execute(Method::Get, &self.path, &params, credential)
            .await?;
        let items = self.envelope.extract(&self.path, body)?;

        tracing::debug!(path = %self.path, ?page, count = items.len(), "fetched page");
        Ok(items)
    }

    /// Fetch exactly one page.
    ///
    /// # Errors
    ///
    /// Propagates transport failures; returns `MalformedResponse` for a body
    /// that is not a list payload.
    pub async fn fetch_page(&self, query: Query, page: u32) -> Result<Page<Record>> {
        let (filters, reserved) = query.split()?;
        let credential = self.resolve_credential(&reserved);
        let items = self
            .fetch_raw(&filters, Some(page), credential.as_deref())
            .await?;
        Ok(Page::new(items, page, reserved.per_page)
            .map(|item| Record::from_map(item, credential.as_deref())))
    }

    /// Fetch the page named by the query's `page` key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the query has no page number.
    pub async fn list_one_page(&self, query: Query) -> Result<Page<Record>> {
        let page = query
            .get(PAGE_KEY)
            .and_then(|p| p.as_positive())
            .ok_or_else(|| GolfGeniusError::invalid("list_one_page requires an explicit page"))?;
        self.fetch_page(query, page).await
    }

    /// Iterate page by page; the caller may stop at any point.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a malformed reserved key.
    pub fn pages(&self, query: Query) -> Result<PageCursor<'a>> {
        let (filters, reserved) = query.split()?;
        Ok(self.cursor(filters, &reserved))
    }

    /// Cursor over already split filters.
    pub(crate) fn cursor(&self, filters: Query, reserved: &Reserved) -> PageCursor<'a> {
        let credential = self.resolve_credential(reserved);
        PageCursor {
            paginator: Paginator {
                transport: self.transport,
                path: self.path.clone(),
                envelope: self.envelope.clone(),
                credential: credential.clone(),
            },
            filters,
            per_page: reserved.per_page,
            credential,
            next: reserved.page.unwrap_or(1),
            single: reserved.page.is_some(),
            previous: None,
            done: false,
        }
    }

    /// Every item across all pages, in page order.
    ///
    /// When the query names a page, only that page is returned.
    ///
    /// # Errors
    ///
    /// Propagates the first failure; nothing is returned partially.
    pub async fn list_all(&self, query: Query) -> Result<Vec<Record>> {
        let mut cursor = self.pages(query)?;
        let mut all_items = Vec::new();
        while let Some(page) = cursor.next_page().await? {
            all_items.extend(page.items);
        }
        Ok(all_items)
    }
}

/// Lazily walks the pages of a listing.
#[derive(Debug)]
pub struct PageCursor<'a> {
    paginator: Paginator<'a>,
    filters: Query,
    per_page: Option<u32>,
    credential: Option<String>,
    next: u32,
    single: bool,
    previous: Option<PageMark>,
    done: bool,
}

impl<'a> PageCursor<'a> {
    /// Override the page-size hint used to spot the last page.
    pub(crate) fn with_page_size(mut self, per_page: Option<u32>) -> Self {
        self.per_page = self.per_page.or(per_page);
        self
    }

    /// Credential every page request is made with.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Next page of raw items, or `None` once the listing is exhausted.
    pub(crate) async fn next_raw(&mut self) -> Result<Option<Page<RawItem>>> {
        if self.done {
            return Ok(None);
        }
        if self.next > MAX_PAGES {
            tracing::warn!(
                path = %self.paginator.path,
                "Reached pagination limit of {} pages, stopping",
                MAX_PAGES
            );
            self.done = true;
            return Ok(None);
        }

        let page = self.next;
        let items = self
            .paginator
            .fetch_raw(&self.filters, Some(page), self.credential.as_deref())
            .await?;

        if self.single {
            self.done = true;
            return Ok(Some(Page::new(items, page, self.per_page)));
        }

        if items.is_empty() {
            self.done = true;
            return Ok(None);
        }

        let mark = PageMark::of(&items);
        if self.previous.as_ref() == Some(&mark) {
            tracing::warn!(
                path = %self.paginator.path,
                page,
                "page repeats the previous page, endpoint ignores pagination; stopping"
            );
            self.done = true;
            return Ok(None);
        }

        if let Some(size) = self.per_page {
            if items.len() < size as usize {
                self.done = true;
            }
        }

        self.previous = Some(mark);
        self.next += 1;

        let mut result = Page::new(items, page, self.per_page);
        result.has_more = !self.done;
        Ok(Some(result))
    }

    /// Next page of records, or `None` once the listing is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and malformed pages.
    pub async fn next_page(&mut self) -> Result<Option<Page<Record>>> {
        let credential = self.credential.clone();
        Ok(self
            .next_raw()
            .await?
            .map(|page| page.map(|item| Record::from_map(item, credential.as_deref()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{paged_items, ScriptedTransport};
    use serde_json::json;

    #[test]
    fn test_page_has_more_with_page_size() {
        // Full page suggests more
        let page: Page<i32> = Page::new(vec![1; 25], 1, Some(25));
        assert!(page.has_more);

        // Partial page means no more
        let page: Page<i32> = Page::new(vec![1; 3], 2, Some(25));
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_has_more_without_page_size() {
        let page: Page<i32> = Page::new(vec![1; 3], 1, None);
        assert!(page.has_more);

        let page: Page<i32> = Page::new(vec![], 2, None);
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], 1, Some(100));
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.page, 1);
    }

    #[test]
    fn test_envelope_bare_array_with_singular_items() {
        let body = json!([{"event": {"id": 1}}, {"event": {"id": 2}}]);
        let items = Envelope::new().extract("/events", body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], json!(1));
    }

    #[test]
    fn test_envelope_data_and_plural_keys() {
        let items = Envelope::new()
            .extract("/seasons", json!({"data": [{"id": 1}], "meta": {}}))
            .unwrap();
        assert_eq!(items.len(), 1);

        let items = Envelope::new()
            .extract("/events/9/courses", json!({"courses": [{"id": 1}, {"id": 2}], "count": 2}))
            .unwrap();
        assert_eq!(items.len(), 2);

        let items = Envelope::new()
            .list_key("players")
            .extract("/events/9/roster", json!({"players": [{"id": 1}], "total": 1}))
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_envelope_single_object_is_one_item() {
        let items = Envelope::new()
            .extract("/events/9", json!({"id": 9, "name": "Open"}))
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], json!("Open"));

        let items = Envelope::new()
            .item_key("event")
            .extract("/events/9", json!({"event": {"id": 9}}))
            .unwrap();
        assert_eq!(items[0]["id"], json!(9));
    }

    #[test]
    fn test_envelope_object_valued_data_attribute_stays_on_record() {
        let items = Envelope::new()
            .extract("/events/e1", json!({"id": "e1", "name": "Open", "data": {"holes": 18}}))
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], json!("e1"));
        assert_eq!(items[0]["name"], json!("Open"));
        assert_eq!(items[0]["data"]["holes"], json!(18));

        // A declared list key holding an object is an attribute too
        let items = Envelope::new()
            .list_key("courses")
            .extract("/events/e1", json!({"id": "e1", "courses": {"count": 2}}))
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["courses"]["count"], json!(2));
    }

    #[test]
    fn test_envelope_declared_item_key_only() {
        // With a declared key, other single-key items are left alone.
        let items = Envelope::new()
            .item_key("member")
            .extract("/events/1/roster", json!([{"member": {"id": 1}}, {"profile": {"id": 2}}]))
            .unwrap();
        assert_eq!(items[0]["id"], json!(1));
        assert!(items[1].contains_key("profile"));
    }

    #[test]
    fn test_envelope_rejects_scalars() {
        let err = Envelope::new().extract("/events", json!("nope")).unwrap_err();
        assert!(matches!(err, GolfGeniusError::MalformedResponse(_)));

        let err = Envelope::new().extract("/events", json!([1, 2])).unwrap_err();
        assert!(matches!(err, GolfGeniusError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_list_all_stops_on_short_page() {
        // 7 items, 3 per page: pages of 3, 3, 1.
        let transport = ScriptedTransport::paged(paged_items("e", 7, 3));
        let paginator = Paginator::new(&transport, "/events");

        let items = paginator
            .list_all(Query::new().with("per_page", 3))
            .await
            .unwrap();

        assert_eq!(items.len(), 7);
        assert_eq!(transport.calls().len(), 3);
        let ids: Vec<String> = items.iter().filter_map(Record::id).collect();
        assert_eq!(ids.first().map(String::as_str), Some("e_1"));
        assert_eq!(ids.last().map(String::as_str), Some("e_7"));
        // The hint is not forwarded.
        assert!(transport.calls().iter().all(|c| !c.query.contains_key("per_page")));
    }

    #[tokio::test]
    async fn test_list_all_stops_on_empty_page_without_hint() {
        let transport = ScriptedTransport::paged(paged_items("e", 4, 2));
        let paginator = Paginator::new(&transport, "/events");

        let items = paginator.list_all(Query::new()).await.unwrap();

        assert_eq!(items.len(), 4);
        // Two full pages, then the empty third page.
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_list_all_stops_when_page_repeats() {
        let page: Vec<JsonValue> = (1..=5).map(|i| json!({"id": format!("e_{i}")})).collect();
        let transport = ScriptedTransport::new(move |_, _| Ok(JsonValue::Array(page.clone())));
        let paginator = Paginator::new(&transport, "/events");

        let items = paginator.list_all(Query::new()).await.unwrap();

        assert_eq!(items.len(), 5);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_list_all_with_explicit_page_fetches_once() {
        let transport = ScriptedTransport::paged(paged_items("e", 10, 3));
        let paginator = Paginator::new(&transport, "/events");

        let items = paginator.list_all(Query::new().page(2)).await.unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(transport.calls().len(), 1);
        assert_eq!(transport.calls()[0].query.get("page").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn test_list_one_page_requires_page() {
        let transport = ScriptedTransport::paged(paged_items("e", 3, 3));
        let paginator = Paginator::new(&transport, "/events");

        let err = paginator.list_one_page(Query::new()).await.unwrap_err();
        assert!(matches!(err, GolfGeniusError::InvalidArgument(_)));
        assert!(transport.calls().is_empty());

        let page = paginator.list_one_page(Query::new().page(1)).await.unwrap();
        assert_eq!(page.len(), 3);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_cursor_can_stop_early() {
        let transport = ScriptedTransport::paged(paged_items("e", 9, 3));
        let paginator = Paginator::new(&transport, "/events");

        let mut cursor = paginator.pages(Query::new()).unwrap();
        let first = cursor.next_page().await.unwrap().unwrap();

        assert_eq!(first.page, 1);
        assert_eq!(first.len(), 3);
        assert!(first.has_more);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_credential_override_and_default() {
        let transport = ScriptedTransport::paged(paged_items("e", 1, 5));
        let paginator = Paginator::new(&transport, "/events");

        let items = paginator
            .list_all(Query::new().credential("other-key"))
            .await
            .unwrap();
        assert_eq!(items[0].credential(), Some("other-key"));
        assert_eq!(transport.calls()[0].credential.as_deref(), Some("other-key"));
        assert!(!transport.calls()[0].query.contains_key("api_key"));

        let items = paginator.list_all(Query::new()).await.unwrap();
        assert_eq!(items[0].credential(), Some(crate::testing::TEST_KEY));
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let transport = ScriptedTransport::new(|_, _| {
            Err(GolfGeniusError::Server {
                message: "down".to_string(),
                status_code: 503,
            })
        });
        let paginator = Paginator::new(&transport, "/events");

        let err = paginator.list_all(Query::new()).await.unwrap_err();
        assert!(matches!(err, GolfGeniusError::Server { status_code: 503, .. }));
        assert_eq!(transport.calls().len(), 1);
    }
}
