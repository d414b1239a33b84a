//! # LMS Rust Backend
//!
//! Academic-content backend for an e-learning platform: courses, lessons,
//! quizzes, assignments, rubrics, certificates, enrollments, and
//! training-program bundling, exposed as a REST API via Axum.
//!
//! ## Architecture
//!
//! The crate is a conventional layered CRUD application:
//!
//! - [`models`]: Domain entities with audit metadata and lifecycle status
//! - [`db`]: Repository traits, in-memory and Postgres backends, dynamic
//!   query filters
//! - [`services`]: Business rules - validation, defaulting, lifecycle
//!   transitions, bundle publish gating, application approval
//! - [`http`]: Axum router, handlers, DTO factories, role guards
//!
//! Storage and HTTP surfaces are selected via cargo features
//! (`local-repo`, `postgres-repo`, `http-server`).

// Allow large error types - RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;

pub mod http;
