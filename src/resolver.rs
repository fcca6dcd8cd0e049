//! Declarative nested resources.
//!
//! Endpoints under a parent (`/events/{event_id}/roster`) differ in envelope,
//! ordering and filtering quirks. A [`NestedResource`] captures those quirks
//! as data: the path template, how items are wrapped, which attributes are
//! aliased, which parent identifiers are copied into each child, how results
//! are sorted, whether the listing is aggregated across pages, and which
//! query parameters are applied client-side instead of being forwarded.
//!
//! ```
//! use golfgenius::{ClientFilter, NestedResource};
//!
//! let roster = NestedResource::collection("roster member", "/events/{event_id}/roster")
//!     .item_key("member")
//!     .inject_parent("event_id")
//!     .paginate(100)
//!     .client_filter(ClientFilter::equals("waitlist", "waitlist"));
//! assert_eq!(roster.placeholders(), ["event_id"]);
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::{GolfGeniusError, Result};
use crate::identify::PageSource;
use crate::pagination::{Envelope, Paginator, RawItem};
use crate::query::{Identified, Param, Query};
use crate::record::{Record, Value};
use crate::transport::Transport;

type FilterFn = dyn Fn(&Record, &Param) -> bool + Send + Sync;

/// A path with `{name}` placeholders, one per parent identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
    placeholders: Vec<String>,
}

impl PathTemplate {
    pub fn parse(template: impl Into<String>) -> Self {
        let template = template.into();
        let mut placeholders = Vec::new();
        let mut rest = template.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            placeholders.push(rest[start + 1..start + len].to_string());
            rest = &rest[start + len + 1..];
        }
        Self {
            template,
            placeholders,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Substitute identifiers, in placeholder order, URL-encoding each.
    ///
    /// # Errors
    ///
    /// Returns `Arity` when the number of identifiers differs from the
    /// number of placeholders.
    pub fn render(&self, ids: &[String]) -> Result<String> {
        if ids.len() != self.placeholders.len() {
            return Err(GolfGeniusError::Arity {
                template: self.template.clone(),
                expected: self.placeholders.len(),
                given: ids.len(),
            });
        }
        let mut path = self.template.clone();
        for (name, id) in self.placeholders.iter().zip(ids) {
            path = path.replace(&format!("{{{name}}}"), &urlencoding::encode(id));
        }
        Ok(path)
    }
}

#[derive(Clone)]
enum FilterTest {
    Equals(String),
    Predicate(Arc<FilterFn>),
}

/// A query parameter consumed client-side as a post-fetch filter.
///
/// The parameter is removed from the outgoing request; when the caller
/// supplies it, only records passing the test are returned.
#[derive(Clone)]
pub struct ClientFilter {
    param: String,
    test: FilterTest,
}

impl fmt::Debug for ClientFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let test = match &self.test {
            FilterTest::Equals(attribute) => format!("equals({attribute})"),
            FilterTest::Predicate(_) => "predicate".to_string(),
        };
        f.debug_struct("ClientFilter")
            .field("param", &self.param)
            .field("test", &test)
            .finish()
    }
}

impl ClientFilter {
    /// Keep records whose `attribute` equals the parameter value.
    pub fn equals(param: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            test: FilterTest::Equals(attribute.into()),
        }
    }

    /// Keep records for which `predicate(record, value)` holds.
    pub fn predicate<F>(param: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Record, &Param) -> bool + Send + Sync + 'static,
    {
        Self {
            param: param.into(),
            test: FilterTest::Predicate(Arc::new(predicate)),
        }
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    fn accepts(&self, record: &Record, value: &Param) -> bool {
        match &self.test {
            FilterTest::Equals(attribute) => record
                .attribute(attribute)
                .map_or(false, |stored| value.matches(stored)),
            FilterTest::Predicate(predicate) => predicate(record, value),
        }
    }
}

/// Exposed name for a raw API attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Alias {
    exposed: String,
    raw: String,
    keep_raw: bool,
}

/// Whether a resource yields one record or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    One,
    Many,
}

/// Result of resolving a resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    One(Record),
    Many(Vec<Record>),
}

impl Resolved {
    pub fn into_many(self) -> Vec<Record> {
        match self {
            Resolved::One(record) => vec![record],
            Resolved::Many(records) => records,
        }
    }

    pub fn into_one(self) -> Option<Record> {
        match self {
            Resolved::One(record) => Some(record),
            Resolved::Many(records) => records.into_iter().next(),
        }
    }
}

/// A declared resource relationship.
#[derive(Debug, Clone)]
pub struct NestedResource {
    name: String,
    template: PathTemplate,
    shape: Shape,
    envelope: Envelope,
    aliases: Vec<Alias>,
    injected: Vec<(String, String)>,
    sort_key: Option<String>,
    paginate: bool,
    page_size: Option<u32>,
    client_filters: Vec<ClientFilter>,
}

impl NestedResource {
    fn new(name: impl Into<String>, template: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            template: PathTemplate::parse(template),
            shape,
            envelope: Envelope::default(),
            aliases: Vec::new(),
            injected: Vec::new(),
            sort_key: None,
            paginate: false,
            page_size: None,
            client_filters: Vec::new(),
        }
    }

    /// A resource returning a list of records.
    pub fn collection(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self::new(name, template, Shape::Many)
    }

    /// A resource returning a single record.
    pub fn single(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self::new(name, template, Shape::One)
    }

    /// Key wrapping each item (`{"round": {...}}`).
    #[must_use]
    pub fn item_key(mut self, key: impl Into<String>) -> Self {
        self.envelope = self.envelope.item_key(key);
        self
    }

    /// Key holding the result array.
    #[must_use]
    pub fn list_key(mut self, key: impl Into<String>) -> Self {
        self.envelope = self.envelope.list_key(key);
        self
    }

    /// Expose raw attribute `raw` as `exposed` too.
    #[must_use]
    pub fn alias(mut self, exposed: impl Into<String>, raw: impl Into<String>) -> Self {
        self.aliases.push(Alias {
            exposed: exposed.into(),
            raw: raw.into(),
            keep_raw: true,
        });
        self
    }

    /// Expose raw attribute `raw` only as `exposed`.
    #[must_use]
    pub fn rename(mut self, exposed: impl Into<String>, raw: impl Into<String>) -> Self {
        self.aliases.push(Alias {
            exposed: exposed.into(),
            raw: raw.into(),
            keep_raw: false,
        });
        self
    }

    /// Copy the identifier bound to `placeholder` into each child under the
    /// same attribute name.
    #[must_use]
    pub fn inject_parent(self, placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        self.inject_parent_as(placeholder.clone(), placeholder)
    }

    /// Copy the identifier bound to `placeholder` into each child as
    /// `attribute`.
    #[must_use]
    pub fn inject_parent_as(
        mut self,
        placeholder: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        self.injected.push((placeholder.into(), attribute.into()));
        self
    }

    /// Sort ascending by `attribute`, missing values first.
    #[must_use]
    pub fn sort_by(mut self, attribute: impl Into<String>) -> Self {
        self.sort_key = Some(attribute.into());
        self
    }

    /// Aggregate all pages by default; `page_size` marks the last page.
    #[must_use]
    pub fn paginate(mut self, page_size: u32) -> Self {
        self.paginate = true;
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn client_filter(mut self, filter: ClientFilter) -> Self {
        self.client_filters.push(filter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    pub fn placeholders(&self) -> &[String] {
        self.template.placeholders()
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    pub fn is_paginated(&self) -> bool {
        self.paginate
    }

    /// Resolve with positional parent identifiers.
    ///
    /// A trailing parent may instead be given in `query` under its
    /// placeholder name.
    ///
    /// # Errors
    ///
    /// Returns `Arity` for a parent count that does not fit the template,
    /// `InvalidArgument` for a parent without an identifier, `NotFound` for
    /// a single resource with an empty response, and propagates transport
    /// failures unchanged.
    pub async fn resolve(
        &self,
        transport: &dyn Transport,
        parents: &[&dyn Identified],
        query: Query,
    ) -> Result<Resolved> {
        let ids = identifiers(parents)?;
        self.run(transport, ids, None, query).await
    }

    /// Resolve as a collection.
    ///
    /// # Errors
    ///
    /// As [`NestedResource::resolve`].
    pub async fn fetch_many(
        &self,
        transport: &dyn Transport,
        parents: &[&dyn Identified],
        query: Query,
    ) -> Result<Vec<Record>> {
        Ok(self.resolve(transport, parents, query).await?.into_many())
    }

    /// Resolve as a single record.
    ///
    /// # Errors
    ///
    /// As [`NestedResource::resolve`]; an empty collection is `NotFound`.
    pub async fn fetch_one(
        &self,
        transport: &dyn Transport,
        parents: &[&dyn Identified],
        query: Query,
    ) -> Result<Record> {
        let ids = identifiers(parents)?;
        let label = ids.join("/");
        self.run(transport, ids, None, query)
            .await?
            .into_one()
            .ok_or_else(|| GolfGeniusError::not_found(self.name.clone(), label))
    }

    /// Bind leading parents, e.g. the event of an event-scoped accessor.
    ///
    /// `credential` is used for every call made through the binding unless
    /// a call's query overrides it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a parent without an identifier.
    pub fn bind<'a>(
        &'a self,
        transport: &'a dyn Transport,
        parents: &[&dyn Identified],
        credential: Option<&str>,
    ) -> Result<BoundResource<'a>> {
        Ok(BoundResource {
            resource: self,
            transport,
            parents: identifiers(parents)?,
            credential: credential.map(str::to_string),
        })
    }

    #[tracing::instrument(
        skip(self, transport, inherited, query),
        fields(resource = %self.name)
    )]
    async fn run(
        &self,
        transport: &dyn Transport,
        mut ids: Vec<String>,
        inherited: Option<&str>,
        mut query: Query,
    ) -> Result<Resolved> {
        // Client filters never reach the transport.
        let mut filters = Vec::new();
        for filter in &self.client_filters {
            if let Some(value) = query.remove(&filter.param) {
                filters.push((filter, value));
            }
        }

        // Missing trailing parents may be passed by name.
        for name in self.placeholders().iter().skip(ids.len()) {
            match query.remove(name) {
                Some(value) => {
                    let id = value.to_string();
                    if id.is_empty() {
                        return Err(GolfGeniusError::invalid(format!("{name} must not be empty")));
                    }
                    ids.push(id);
                }
                None => break,
            }
        }

        let (forwarded, reserved) = query.split()?;
        let path = self.template.render(&ids)?;

        let paginator = Paginator::new(transport, path)
            .envelope(self.envelope.clone())
            .credential(inherited.map(str::to_string));
        let credential = paginator.resolve_credential(&reserved);

        let raw_items: Vec<RawItem> =
            if self.shape == Shape::Many && self.paginate && reserved.page.is_none() {
                let mut cursor = paginator
                    .cursor(forwarded, &reserved)
                    .with_page_size(self.page_size);
                let mut all = Vec::new();
                while let Some(page) = cursor.next_raw().await? {
                    all.extend(page.items);
                }
                all
            } else {
                paginator
                    .fetch_raw(&forwarded, reserved.page, credential.as_deref())
                    .await?
            };

        let mut records: Vec<Record> = raw_items
            .into_iter()
            .map(|item| self.prepare(item, &ids))
            .map(|item| Record::from_map(item, credential.as_deref()))
            .collect();

        for (filter, value) in &filters {
            records.retain(|record| filter.accepts(record, value));
        }

        if let Some(key) = &self.sort_key {
            records.sort_by(|a, b| Value::sort_cmp(a.attribute(key), b.attribute(key)));
        }

        tracing::debug!(count = records.len(), "resolved");

        match self.shape {
            Shape::Many => Ok(Resolved::Many(records)),
            Shape::One => records
                .into_iter()
                .next()
                .map(Resolved::One)
                .ok_or_else(|| GolfGeniusError::not_found(self.name.clone(), ids.join("/"))),
        }
    }

    /// Aliases and parent context, applied before record construction.
    fn prepare(&self, mut item: RawItem, ids: &[String]) -> RawItem {
        for alias in &self.aliases {
            let value = if alias.keep_raw {
                item.get(&alias.raw).cloned()
            } else {
                item.remove(&alias.raw)
            };
            if let Some(value) = value {
                item.insert(alias.exposed.clone(), value);
            }
        }

        for (placeholder, attribute) in &self.injected {
            let Some(index) = self.placeholders().iter().position(|p| p == placeholder) else {
                continue;
            };
            let missing = item.get(attribute).map_or(true, JsonValue::is_null);
            if missing {
                if let Some(id) = ids.get(index) {
                    item.insert(attribute.clone(), JsonValue::String(id.clone()));
                }
            }
        }

        item
    }
}

fn identifiers(parents: &[&dyn Identified]) -> Result<Vec<String>> {
    parents
        .iter()
        .map(|parent| {
            parent
                .identifier()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| GolfGeniusError::invalid("parent has no identifier"))
        })
        .collect()
}

/// A [`NestedResource`] with its leading parents fixed.
#[derive(Clone)]
pub struct BoundResource<'a> {
    resource: &'a NestedResource,
    transport: &'a dyn Transport,
    parents: Vec<String>,
    credential: Option<String>,
}

impl fmt::Debug for BoundResource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundResource")
            .field("resource", &self.resource.name)
            .field("parents", &self.parents)
            .finish_non_exhaustive()
    }
}

impl BoundResource<'_> {
    /// Resolve, optionally supplying the last parent positionally.
    ///
    /// # Errors
    ///
    /// As [`NestedResource::resolve`].
    pub async fn resolve(&self, last: Option<&dyn Identified>, query: Query) -> Result<Resolved> {
        let mut ids = self.parents.clone();
        if let Some(last) = last {
            ids.extend(identifiers(&[last])?);
        }
        self.resource
            .run(self.transport, ids, self.credential.as_deref(), query)
            .await
    }

    /// # Errors
    ///
    /// As [`NestedResource::resolve`].
    pub async fn fetch_many(
        &self,
        last: Option<&dyn Identified>,
        query: Query,
    ) -> Result<Vec<Record>> {
        Ok(self.resolve(last, query).await?.into_many())
    }

    /// # Errors
    ///
    /// As [`NestedResource::fetch_one`].
    pub async fn fetch_one(&self, last: Option<&dyn Identified>, query: Query) -> Result<Record> {
        let label = self.parents.join("/");
        self.resolve(last, query)
            .await?
            .into_one()
            .ok_or_else(|| GolfGeniusError::not_found(self.resource.name.clone(), label))
    }
}

#[async_trait]
impl PageSource for BoundResource<'_> {
    async fn list_page(&self, query: Query, page: u32) -> Result<Vec<Record>> {
        self.fetch_many(None, query.page(page)).await
    }
}
