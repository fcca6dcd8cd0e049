//! Request filters.
//!
//! A [`Query`] is a flat map of filter parameters. A few keys are reserved and
//! never forwarded as filters: the page cursor (`page`), the page-size hint
//! (`per_page` or `limit`) and the credential override (`api_key`).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{GolfGeniusError, Result};
use crate::record::{Record, Value};
use crate::transport::QueryParams;

/// Page cursor key.
pub const PAGE_KEY: &str = "page";
/// Page-size hint keys.
pub const PER_PAGE_KEYS: &[&str] = &["per_page", "limit"];
/// Credential override key.
pub const CREDENTIAL_KEY: &str = "api_key";

/// Anything that exposes an identifier.
///
/// Raw identifiers (strings, integers) identify themselves; records and
/// models answer with their `id` attribute.
pub trait Identified: Sync {
    fn identifier(&self) -> Option<String>;
}

impl Identified for str {
    fn identifier(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl Identified for String {
    fn identifier(&self) -> Option<String> {
        Some(self.clone())
    }
}

macro_rules! identified_integer {
    ($($ty:ty),*) => {
        $(impl Identified for $ty {
            fn identifier(&self) -> Option<String> {
                Some(self.to_string())
            }
        })*
    };
}

identified_integer!(u32, u64, i32, i64, usize);

impl Identified for Record {
    fn identifier(&self) -> Option<String> {
        self.id()
    }
}

impl<T: Identified + ?Sized> Identified for &T {
    fn identifier(&self) -> Option<String> {
        (**self).identifier()
    }
}

/// A scalar query parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Param {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Param {
    /// Parameter holding the identifier of a domain object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the object has no identifier.
    pub fn id_of(object: &(impl Identified + ?Sized)) -> Result<Self> {
        object
            .identifier()
            .map(Param::Str)
            .ok_or_else(|| GolfGeniusError::invalid("object has no identifier"))
    }

    /// Parse as a positive integer (page numbers, page sizes).
    pub fn as_positive(&self) -> Option<u32> {
        let n = match self {
            Param::Int(n) => u32::try_from(*n).ok(),
            Param::Str(s) => s.trim().parse().ok(),
            Param::Float(_) | Param::Bool(_) => None,
        }?;
        (n > 0).then_some(n)
    }

    /// Whether a record value is equal to this parameter.
    ///
    /// Booleans compare by truthiness of the parameter text (`"false"` equals
    /// a stored `false`); everything else compares textually.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Param::Bool(b), Value::Bool(v)) => b == v,
            (Param::Str(s), Value::Bool(v)) => s.eq_ignore_ascii_case(if *v { "true" } else { "false" }),
            (Param::Bool(_), _) => false,
            (param, value) => value
                .to_id_string()
                .map_or(false, |text| text == param.to_string()),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Str(s) => f.write_str(s),
            Param::Int(n) => write!(f, "{n}"),
            Param::Float(x) => write!(f, "{x}"),
            Param::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Str(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Str(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Float(value)
    }
}

macro_rules! param_from_integer {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Param {
            fn from(value: $ty) -> Self {
                Param::Int(i64::from(value))
            }
        })*
    };
}

param_from_integer!(i32, i64, u32);

/// Reserved values split out of a [`Query`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reserved {
    /// Explicit page requested by the caller.
    pub page: Option<u32>,
    /// Caller's page-size hint.
    pub per_page: Option<u32>,
    /// Credential override.
    pub credential: Option<String>,
}

/// Filter parameters for a resource request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Query {
    params: BTreeMap<String, Param>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Param>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a parameter referencing a domain object by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the object has no identifier.
    pub fn with_ref(
        mut self,
        key: impl Into<String>,
        object: &(impl Identified + ?Sized),
    ) -> Result<Self> {
        self.params.insert(key.into(), Param::id_of(object)?);
        Ok(self)
    }

    /// Request a specific page.
    #[must_use]
    pub fn page(self, page: u32) -> Self {
        self.with(PAGE_KEY, page)
    }

    /// Override the credential for this call.
    #[must_use]
    pub fn credential(self, api_key: impl Into<String>) -> Self {
        self.with(CREDENTIAL_KEY, api_key.into())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Param>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Param> {
        self.params.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Param> {
        self.params.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Separate reserved keys from forwarded filters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a page or page size that is not a
    /// positive integer.
    pub fn split(mut self) -> Result<(Query, Reserved)> {
        let page = match self.params.remove(PAGE_KEY) {
            Some(p) => Some(p.as_positive().ok_or_else(|| {
                GolfGeniusError::invalid(format!("page must be a positive integer, got '{p}'"))
            })?),
            None => None,
        };

        let mut per_page = None;
        for key in PER_PAGE_KEYS {
            if let Some(p) = self.params.remove(*key) {
                let size = p.as_positive().ok_or_else(|| {
                    GolfGeniusError::invalid(format!("{key} must be a positive integer, got '{p}'"))
                })?;
                per_page.get_or_insert(size);
            }
        }

        let credential = self.params.remove(CREDENTIAL_KEY).map(|p| p.to_string());

        Ok((
            self,
            Reserved {
                page,
                per_page,
                credential,
            },
        ))
    }

    /// Wire form of the parameters.
    pub fn to_params(&self) -> QueryParams {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Param>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (k, v) in iter {
            query.insert(k, v);
        }
        query
    }
}
