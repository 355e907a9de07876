//! Typed planning endpoints, consumed by the authenticated views.

use crate::api_client::{ApiClient, ApiError};
use explanner_model::api_routes::planning as routes;
use explanner_model::{
    Course, CourseSet, Department, PlanRequest, PlanResponse, TimetableSummary, Venue, VenueSet,
};

impl ApiClient {
    pub async fn list_departments(&self) -> Result<Vec<Department>, ApiError> {
        self.get(routes::DEPARTMENTS).await
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get(routes::COURSES).await
    }

    /// Registers a new course; returns the stored record (with its id).
    pub async fn create_course(&self, course: &Course) -> Result<Course, ApiError> {
        self.post(routes::COURSES, course).await
    }

    pub async fn list_venues(&self) -> Result<Vec<Venue>, ApiError> {
        self.get(routes::VENUES).await
    }

    /// Registers a new venue; returns the stored record (with its id).
    pub async fn create_venue(&self, venue: &Venue) -> Result<Venue, ApiError> {
        self.post(routes::VENUES, venue).await
    }

    pub async fn list_course_sets(&self) -> Result<Vec<CourseSet>, ApiError> {
        self.get(routes::COURSE_SETS).await
    }

    pub async fn list_venue_sets(&self) -> Result<Vec<VenueSet>, ApiError> {
        self.get(routes::VENUE_SETS).await
    }

    /// Submits a plan request for generation. Generation runs server-side;
    /// an empty `data_dict` in the response means the backend declined to
    /// produce a timetable for these inputs.
    pub async fn submit_plan(&self, request: &PlanRequest) -> Result<PlanResponse, ApiError> {
        self.post(routes::PROCESS_TIMETABLE, request).await
    }

    pub async fn list_timetables(&self) -> Result<Vec<TimetableSummary>, ApiError> {
        self.get(routes::EXAM_TIMETABLES).await
    }
}
