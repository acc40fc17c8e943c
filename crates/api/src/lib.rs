// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary layer for the CampTrack back office.
//!
//! This crate sits between the HTTP server and the persistence layer.
//! It owns the wire contract (request/response DTOs), role-based
//! authorization, the translation of domain and persistence errors into
//! API errors, and the scheduled job entry points.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use jobs::{ExpiryScanReport, ReleaseJobReport, TerminationJobReport};
