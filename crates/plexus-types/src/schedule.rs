//! Opaque schedule handles.
//!
//! Schedules are produced by an external schedule builder. The composition
//! core stores them and inspects nothing beyond their insertion points.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Id of a schedule stored with a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScheduleId(u64);

impl ScheduleId {
    /// Wraps a raw schedule number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw schedule number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schedule-{}", self.0)
    }
}

/// Id of an element (vertex) inside a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScheduleElementId(u64);

impl ScheduleElementId {
    /// Wraps a raw element number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw element number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Point in a schedule where the schedule of an imported group is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsertPoint {
    element: ScheduleElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_insertions: Option<u32>,
}

impl InsertPoint {
    /// Creates an unbounded insertion point at the given element.
    #[must_use]
    pub const fn new(element: ScheduleElementId) -> Self {
        Self {
            element,
            max_insertions: None,
        }
    }

    /// Limits how many schedules may be inserted at this point.
    #[must_use]
    pub const fn with_max_insertions(mut self, max_insertions: u32) -> Self {
        self.max_insertions = Some(max_insertions);
        self
    }

    /// Returns the schedule element that hosts the insertion.
    #[must_use]
    pub const fn element(&self) -> ScheduleElementId {
        self.element
    }

    /// Returns the insertion limit, `None` when unbounded.
    #[must_use]
    pub const fn max_insertions(&self) -> Option<u32> {
        self.max_insertions
    }
}

/// A schedule as produced by the schedule builder.
///
/// The body is kept as opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDefinition {
    body: serde_json::Value,
    #[serde(default)]
    insert_points: Vec<InsertPoint>,
}

impl ScheduleDefinition {
    /// Wraps an opaque schedule body.
    #[must_use]
    pub const fn new(body: serde_json::Value) -> Self {
        Self {
            body,
            insert_points: Vec::new(),
        }
    }

    /// Records an insertion point exposed by the schedule.
    #[must_use]
    pub fn with_insert_point(mut self, insert_point: InsertPoint) -> Self {
        self.insert_points.push(insert_point);
        self
    }

    /// Returns the opaque schedule body.
    #[must_use]
    pub const fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// Returns the insertion points exposed by the schedule.
    #[must_use]
    pub fn insert_points(&self) -> &[InsertPoint] {
        &self.insert_points
    }
}
