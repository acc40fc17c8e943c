// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use camptrack_domain::DomainError;
use camptrack_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent
/// the API contract. The server layer maps each variant to an HTTP
/// status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The operation is not allowed in the entity's current state.
    InvalidState {
        /// The rule that blocked the operation.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The operation conflicts with existing data.
    Conflict {
        /// The rule that blocked the operation.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::NotFound { resource, message } => {
                write!(f, "{resource} not found: {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::InvalidState { rule, message } => {
                write!(f, "Invalid state ({rule}): {message}")
            }
            Self::Conflict { rule, message } => {
                write!(f, "Conflict ({rule}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly. Validation failures become `InvalidInput`, lifecycle rule
/// violations become `InvalidState`, and collisions with existing data
/// become `Conflict`.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: &DomainError) -> ApiError {
    match err {
        DomainError::InvalidCampaignStatus(_)
        | DomainError::InvalidCampaignKind(_)
        | DomainError::InvalidClientType(_)
        | DomainError::InvalidAssignmentStatus(_)
        | DomainError::InvalidMaterialGrade(_)
        | DomainError::InvalidPaymentType(_)
        | DomainError::InvalidPaymentStatus(_) => ApiError::InvalidInput {
            field: String::from("value"),
            message: err.to_string(),
        },
        DomainError::DateParseError { .. } | DomainError::DateFormatError { .. } => {
            ApiError::InvalidInput {
                field: String::from("date"),
                message: err.to_string(),
            }
        }
        DomainError::EndDateNotAfterStart { .. } => ApiError::InvalidInput {
            field: String::from("end_date"),
            message: err.to_string(),
        },
        DomainError::NonPositiveAmount { .. } => ApiError::InvalidInput {
            field: String::from("amount"),
            message: err.to_string(),
        },
        DomainError::DateOverlap { .. } => ApiError::Conflict {
            rule: String::from("location_exclusivity"),
            message: err.to_string(),
        },
        DomainError::DuplicateAssignment { .. } => ApiError::Conflict {
            rule: String::from("unique_assignment"),
            message: err.to_string(),
        },
        DomainError::ServiceMismatch { .. } => ApiError::InvalidState {
            rule: String::from("service_match"),
            message: err.to_string(),
        },
        DomainError::ProviderUnavailable { .. } => ApiError::InvalidState {
            rule: String::from("provider_availability"),
            message: err.to_string(),
        },
        DomainError::ProviderCommitted { .. } => ApiError::Conflict {
            rule: String::from("provider_commitment"),
            message: err.to_string(),
        },
        DomainError::ProviderCapacityReached { .. } => ApiError::Conflict {
            rule: String::from("provider_capacity"),
            message: err.to_string(),
        },
        DomainError::DuplicatePayment { .. } => ApiError::Conflict {
            rule: String::from("unique_payment"),
            message: err.to_string(),
        },
        DomainError::SettlementStarted { .. } => ApiError::Conflict {
            rule: String::from("settlement_started"),
            message: err.to_string(),
        },
        DomainError::AlreadyUninstalled { .. } => ApiError::InvalidState {
            rule: String::from("single_confirmation"),
            message: err.to_string(),
        },
        DomainError::CampaignHasAssignments { .. } | DomainError::CampaignHasFiles { .. } => {
            ApiError::Conflict {
                rule: String::from("campaign_delete_guards"),
                message: err.to_string(),
            }
        }
        DomainError::InvalidStatusTransition { .. } => ApiError::InvalidState {
            rule: String::from("status_transition"),
            message: err.to_string(),
        },
        DomainError::TransitionRequiresAssignments { .. } => ApiError::InvalidState {
            rule: String::from("launch_requires_assignments"),
            message: err.to_string(),
        },
        DomainError::RenewalSourceNotFinished { .. } => ApiError::InvalidState {
            rule: String::from("renewal_source_finished"),
            message: err.to_string(),
        },
        DomainError::NoRenewalCandidates { .. } | DomainError::AllCandidatesSkipped { .. } => {
            ApiError::InvalidState {
                rule: String::from("renewal_candidates"),
                message: err.to_string(),
            }
        }
        DomainError::CampaignNotEnded { .. } => ApiError::InvalidState {
            rule: String::from("uninstallation_window"),
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Missing-row errors become `NotFound`; domain rule violations carried
/// through the persistence layer are translated like domain errors;
/// everything else is reported as internal.
#[must_use]
pub fn translate_persistence_error(err: &PersistenceError) -> ApiError {
    match err {
        PersistenceError::CampaignNotFound(id) => ApiError::NotFound {
            resource: String::from("Campaign"),
            message: format!("Campaign {id} does not exist"),
        },
        PersistenceError::ProviderNotFound(id) => ApiError::NotFound {
            resource: String::from("Provider"),
            message: format!("Provider {id} does not exist"),
        },
        PersistenceError::ClientNotFound(id) => ApiError::NotFound {
            resource: String::from("Client"),
            message: format!("Client {id} does not exist"),
        },
        PersistenceError::AssignmentNotFound {
            campaign_id,
            provider_id,
        } => ApiError::NotFound {
            resource: String::from("Assignment"),
            message: format!(
                "No assignment links provider {provider_id} to campaign {campaign_id}"
            ),
        },
        PersistenceError::ConditionNotFound(id) => ApiError::NotFound {
            resource: String::from("Material condition"),
            message: format!("Material condition {id} does not exist"),
        },
        PersistenceError::PaymentNotFound(id) => ApiError::NotFound {
            resource: String::from("Payment"),
            message: format!("Payment {id} does not exist"),
        },
        PersistenceError::NotFound(message) => ApiError::NotFound {
            resource: String::from("Record"),
            message: message.clone(),
        },
        PersistenceError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(&err)
    }
}
