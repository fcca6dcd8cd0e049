//! Courses and divisions of an event.

use std::sync::LazyLock;

use crate::record::Value;
use crate::resolver::NestedResource;

pub(crate) static COURSES: LazyLock<NestedResource> = LazyLock::new(|| {
    NestedResource::collection("course", "/events/{event_id}/courses")
        .list_key("courses")
        .inject_parent("event_id")
});

pub(crate) static DIVISIONS: LazyLock<NestedResource> = LazyLock::new(|| {
    NestedResource::collection("division", "/events/{event_id}/divisions")
        .item_key("division")
        .inject_parent("event_id")
        .sort_by("position")
});

record_model! {
    /// A course played during an event, with its tee sets.
    Course
}

impl Course {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn tees(&self) -> &[Value] {
        self.get_list("tees").unwrap_or_default()
    }
}

record_model! {
    /// A flight or division players are grouped into.
    Division
}

impl Division {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn position(&self) -> Option<i64> {
        self.get_i64("position")
    }
}
