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

//! Notification trigger points.
//!
//! Back-office operations emit notification events at well-defined points
//! (assignment created, campaign auto-terminated, penalty applied, and so
//! on). Delivery is pluggable through [`NotificationSink`]; the default
//! [`LogSink`] records every event on the tracing subscriber so operators
//! can wire a real channel later without touching the call sites.

use camptrack_domain::PaymentType;

/// A notification event produced by a back-office operation.
///
/// Events carry identifiers rather than full entities; a sink that needs
/// more detail is expected to look it up itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A provider was attached to a campaign.
    AssignmentCreated {
        /// The campaign the provider was attached to.
        campaign_id: i64,
        /// The attached provider.
        provider_id: i64,
    },
    /// A provider was detached from a campaign before settlement.
    AssignmentRemoved {
        /// The campaign the provider was detached from.
        campaign_id: i64,
        /// The detached provider.
        provider_id: i64,
    },
    /// A campaign changed status, manually or through a sweep.
    CampaignStatusChanged {
        /// The campaign whose status changed.
        campaign_id: i64,
        /// The previous status, as stored.
        from: String,
        /// The new status, as stored.
        to: String,
    },
    /// A campaign passed its end date and was terminated by the sweep.
    CampaignAutoTerminated {
        /// The terminated campaign.
        campaign_id: i64,
    },
    /// An assignment's scheduled end date arrived and it was closed.
    AssignmentAutoReleased {
        /// The campaign the assignment belonged to.
        campaign_id: i64,
        /// The released provider.
        provider_id: i64,
    },
    /// A penalty was applied against a provider's material condition.
    PenaltyApplied {
        /// The campaign the condition was reported under.
        campaign_id: i64,
        /// The penalized provider.
        provider_id: i64,
        /// The penalty amount.
        amount: i64,
    },
    /// A payment reached the PAYE status.
    PaymentSettled {
        /// The settled payment.
        payment_id: i64,
        /// The payment's type.
        payment_type: PaymentType,
    },
    /// A provider confirmed de-installation of campaign material.
    UninstallationConfirmed {
        /// The ended campaign.
        campaign_id: i64,
        /// The confirming provider.
        provider_id: i64,
    },
    /// A campaign was renewed into a successor.
    CampaignRenewed {
        /// The finished source campaign.
        source_campaign_id: i64,
        /// The newly created successor.
        new_campaign_id: i64,
    },
    /// An open assignment ends within the warning window.
    AssignmentEndingSoon {
        /// The campaign the assignment belongs to.
        campaign_id: i64,
        /// The affected provider.
        provider_id: i64,
        /// Whole days until the scheduled end.
        days_remaining: i64,
    },
    /// A non-terminal campaign's end date falls within the warning window.
    CampaignExpiringSoon {
        /// The expiring campaign.
        campaign_id: i64,
        /// Whole days until the end date.
        days_remaining: i64,
    },
}

impl NotificationEvent {
    /// Returns a stable short name for the event, used as the log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AssignmentCreated { .. } => "assignment_created",
            Self::AssignmentRemoved { .. } => "assignment_removed",
            Self::CampaignStatusChanged { .. } => "campaign_status_changed",
            Self::CampaignAutoTerminated { .. } => "campaign_auto_terminated",
            Self::AssignmentAutoReleased { .. } => "assignment_auto_released",
            Self::PenaltyApplied { .. } => "penalty_applied",
            Self::PaymentSettled { .. } => "payment_settled",
            Self::UninstallationConfirmed { .. } => "uninstallation_confirmed",
            Self::CampaignRenewed { .. } => "campaign_renewed",
            Self::AssignmentEndingSoon { .. } => "assignment_ending_soon",
            Self::CampaignExpiringSoon { .. } => "campaign_expiring_soon",
        }
    }
}

/// Delivery channel for notification events.
///
/// Implementations must be infallible from the caller's point of view:
/// a notification failure must never roll back the operation that
/// produced it.
pub trait NotificationSink: Send + Sync {
    /// Delivers one event.
    fn publish(&self, event: &NotificationEvent);
}

/// Sink that records events on the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn publish(&self, event: &NotificationEvent) {
        tracing::info!(kind = event.kind(), event = ?event, "notification");
    }
}

/// Sink that collects events in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: std::sync::Mutex<Vec<NotificationEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event published so far.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl NotificationSink for MemorySink {
    fn publish(&self, event: &NotificationEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event.clone());
        }
    }
}
