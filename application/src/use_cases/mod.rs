//! Use cases (application services)

pub mod review_coordinator;
