//! Wire-level data model for the explanner backend.
//!
//! These types mirror the JSON bodies the backend produces and consumes.
//! They carry no behavior beyond serialization and a few constructors that
//! own wire-format quirks; everything stateful lives in `explanner-client`.

pub mod api_routes;
pub mod auth;
pub mod planning;

pub use auth::{AccessClaims, CredentialPair, ErrorBody, LoginRequest, RefreshRequest};
pub use planning::{
    Course, CourseDetail, CourseSet, Department, PlanRequest, PlanResponse, TimetableSummary,
    Venue, VenueDetail, VenueSet,
};
