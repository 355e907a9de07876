//! Planning resource wire types.
//!
//! Shapes follow the backend's JSON exactly, including the plan-request
//! quirk of double-encoding set details as JSON strings inside the outer
//! JSON body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An academic department offering courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

/// A registered course as listed and created via `courses/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub code: String,
    pub units: u32,
    pub num_students: u32,
    /// Department name, matching an entry from `departments/`.
    pub department: String,
    /// Course level, e.g. "100" or "400".
    pub level: String,
}

/// A registered examination venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub capacity: u32,
}

/// Course entry inside a course set, and the element type of a plan
/// request's `courseDetails` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDetail {
    pub code: String,
    pub num_students: u32,
    pub units: u32,
    pub department_name: String,
    pub level: String,
}

/// Venue entry inside a venue set, and the element type of a plan request's
/// `venueDetails` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDetail {
    pub name: String,
    pub capacity: u32,
}

/// A named selection of courses to be planned together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub courses: Vec<CourseDetail>,
}

/// A named selection of venues available to a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub venues: Vec<VenueDetail>,
}

/// Body for `POST process-time-table/`.
///
/// `venue_details` and `course_details` travel as JSON-encoded strings, not
/// nested arrays; [`PlanRequest::new`] owns that encoding so callers never
/// hand-build them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub title: String,
    #[serde(rename = "venueDetails")]
    pub venue_details: String,
    #[serde(rename = "courseDetails")]
    pub course_details: String,
    #[serde(rename = "startDate")]
    pub start_date: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end_date: DateTime<Utc>,
    /// Free-text scheduling constraints, may be empty.
    pub constraints: String,
    pub course_set_name: String,
    pub venue_set_name: String,
}

impl PlanRequest {
    /// Builds a plan request from a course set and a venue set, encoding the
    /// detail payloads the way the backend expects them.
    pub fn new(
        title: impl Into<String>,
        course_set: &CourseSet,
        venue_set: &VenueSet,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        constraints: impl Into<String>,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            title: title.into(),
            venue_details: serde_json::to_string(&venue_set.venues)?,
            course_details: serde_json::to_string(&course_set.courses)?,
            start_date,
            end_date,
            constraints: constraints.into(),
            course_set_name: course_set.name.clone(),
            venue_set_name: venue_set.name.clone(),
        })
    }
}

/// Response body of `POST process-time-table/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Generated timetable payload; absent when generation did not produce
    /// a result.
    #[serde(default)]
    pub data_dict: Option<serde_json::Value>,
}

impl PlanResponse {
    /// Whether the backend actually produced a timetable.
    pub fn generated(&self) -> bool {
        self.data_dict.is_some()
    }
}

/// A previously generated timetable as listed by `exam-time-table/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub course_set_name: String,
    pub venue_set_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Download URL for the rendered timetable, when the backend exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl TimetableSummary {
    /// Case-insensitive match against title, course set, or venue set name.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.course_set_name.to_lowercase().contains(&term)
            || self.venue_set_name.to_lowercase().contains(&term)
    }
}
