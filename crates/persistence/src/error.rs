// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use camptrack::CoreError;
use camptrack_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested campaign was not found.
    CampaignNotFound(i64),
    /// The requested provider was not found.
    ProviderNotFound(i64),
    /// The requested client was not found.
    ClientNotFound(i64),
    /// No assignment exists for the pair.
    AssignmentNotFound { campaign_id: i64, provider_id: i64 },
    /// The requested material condition was not found.
    ConditionNotFound(i64),
    /// The requested payment was not found.
    PaymentNotFound(i64),
    /// A business rule was violated.
    DomainViolation(DomainError),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::CampaignNotFound(id) => write!(f, "Campaign not found: {id}"),
            Self::ProviderNotFound(id) => write!(f, "Provider not found: {id}"),
            Self::ClientNotFound(id) => write!(f, "Client not found: {id}"),
            Self::AssignmentNotFound {
                campaign_id,
                provider_id,
            } => write!(
                f,
                "No assignment found for campaign {campaign_id} and provider {provider_id}"
            ),
            Self::ConditionNotFound(id) => write!(f, "Material condition not found: {id}"),
            Self::PaymentNotFound(id) => write!(f, "Payment not found: {id}"),
            Self::DomainViolation(err) => write!(f, "{err}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::QueryFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(inner) => Self::DomainViolation(inner),
        }
    }
}
