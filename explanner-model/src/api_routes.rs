//! Path constants for the backend API, relative to the configured API root.
//!
//! The backend is a Django-style service; trailing slashes are significant.

/// Token issuance and rotation endpoints. Only the session controller in
/// `explanner-client` may call these.
pub mod token {
    /// `POST` `{ username, password }` -> `200 { access, refresh }`.
    pub const ISSUE: &str = "token/";
    /// `POST` `{ refresh }` -> `200 { access, refresh }`.
    pub const REFRESH: &str = "token/refresh/";
}

/// Planning resource endpoints consumed by the authenticated pages.
pub mod planning {
    pub const DEPARTMENTS: &str = "departments/";
    pub const COURSES: &str = "courses/";
    pub const VENUES: &str = "venues/";
    pub const COURSE_SETS: &str = "course-sets/";
    pub const VENUE_SETS: &str = "venue-sets/";
    /// Submits a plan request for generation on the backend.
    pub const PROCESS_TIMETABLE: &str = "process-time-table/";
    /// Lists previously generated exam timetables.
    pub const EXAM_TIMETABLES: &str = "exam-time-table/";
}
