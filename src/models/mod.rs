//! Golf Genius API model types.
//!
//! Every model wraps a [`Record`](crate::Record) and derefs to it, so all
//! payload attributes stay reachable; the models add typed accessors for the
//! common ones and the nested resources hanging off them.

/// Declares a record-backed model type.
macro_rules! record_model {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(crate::record::Record);

        impl $name {
            /// The underlying record.
            pub fn record(&self) -> &crate::record::Record {
                &self.0
            }

            pub fn into_record(self) -> crate::record::Record {
                self.0
            }
        }

        impl From<crate::record::Record> for $name {
            fn from(record: crate::record::Record) -> Self {
                Self(record)
            }
        }

        impl std::ops::Deref for $name {
            type Target = crate::record::Record;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl crate::query::Identified for $name {
            fn identifier(&self) -> Option<String> {
                self.0.id()
            }
        }
    };
}

/// Converts resolved records into a model.
fn wrap<T: From<crate::record::Record>>(records: Vec<crate::record::Record>) -> Vec<T> {
    records.into_iter().map(T::from).collect()
}

mod catalog;
mod course;
mod event;
mod roster;
mod round;

pub use catalog::*;
pub use course::*;
pub use event::*;
pub use roster::*;
pub use round::*;
