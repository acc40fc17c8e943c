// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduled job entry points.
//!
//! These wrap the persistence sweeps for callers that run on a timer or
//! behind a secret-guarded endpoint. A failed sweep is reported in the
//! job outcome instead of an `Err`, so one bad run never takes the
//! scheduler down; the caller decides whether to alert on it.

use time::{Date, OffsetDateTime};
use tracing::{error, info};

use crate::error::ApiError;
use camptrack_domain::{Campaign, CampaignStatus};
use camptrack_notify::{NotificationEvent, NotificationSink};
use camptrack_persistence::Persistence;

/// Days before an end date at which expiry warnings fire.
const ASSIGNMENT_WARNING_DAYS: [i64; 2] = [7, 2];
const CAMPAIGN_WARNING_DAYS: i64 = 7;

/// The outcome of one auto-termination run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminationJobReport {
    pub success: bool,
    /// The sweep failure, when `success` is false.
    pub error: Option<String>,
    pub campaigns_terminated: i64,
    pub assignments_closed: i64,
    pub providers_released: i64,
}

/// The outcome of one auto-release run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseJobReport {
    pub success: bool,
    /// The sweep failure, when `success` is false.
    pub error: Option<String>,
    pub assignments_closed: i64,
    pub providers_released: i64,
}

/// What one expiry scan emitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpiryScanReport {
    pub assignment_alerts: i64,
    pub campaign_alerts: i64,
}

/// Runs the auto-termination sweep, publishing an event per terminated
/// campaign.
pub fn run_auto_termination(
    db: &mut Persistence,
    sink: &dyn NotificationSink,
    now: OffsetDateTime,
) -> TerminationJobReport {
    match db.auto_terminate(now) {
        Ok(sweep) => {
            for campaign_id in &sweep.terminated_campaign_ids {
                sink.publish(&NotificationEvent::CampaignAutoTerminated {
                    campaign_id: *campaign_id,
                });
            }
            TerminationJobReport {
                success: true,
                error: None,
                campaigns_terminated: sweep.campaigns_terminated,
                assignments_closed: sweep.assignments_closed,
                providers_released: sweep.providers_released,
            }
        }
        Err(e) => {
            error!(error = %e, "Auto-termination sweep failed");
            TerminationJobReport {
                success: false,
                error: Some(e.to_string()),
                ..TerminationJobReport::default()
            }
        }
    }
}

/// Runs the auto-release sweep, publishing an event per closed
/// assignment.
pub fn run_auto_release(
    db: &mut Persistence,
    sink: &dyn NotificationSink,
    now: OffsetDateTime,
) -> ReleaseJobReport {
    match db.auto_release(now) {
        Ok(sweep) => {
            for (campaign_id, provider_id) in &sweep.closed_pairs {
                sink.publish(&NotificationEvent::AssignmentAutoReleased {
                    campaign_id: *campaign_id,
                    provider_id: *provider_id,
                });
            }
            ReleaseJobReport {
                success: true,
                error: None,
                assignments_closed: sweep.assignments_matched,
                providers_released: sweep.providers_released,
            }
        }
        Err(e) => {
            error!(error = %e, "Auto-release sweep failed");
            ReleaseJobReport {
                success: false,
                error: Some(e.to_string()),
                ..ReleaseJobReport::default()
            }
        }
    }
}

/// Scans for approaching end dates and emits the expiry warnings.
///
/// Open assignments warn at exactly 7 and 2 whole days before their
/// scheduled end; ONGOING campaigns warn at exactly 7 days before their
/// end date. Running the scan once per day therefore emits each warning
/// once.
///
/// # Errors
///
/// Returns an error if any read fails; nothing is written either way.
pub fn scan_expiry_notifications(
    db: &mut Persistence,
    sink: &dyn NotificationSink,
    now: OffsetDateTime,
) -> Result<ExpiryScanReport, ApiError> {
    let today: Date = now.date();
    let mut report = ExpiryScanReport::default();

    for assignment in db.list_open_assignments()? {
        let Some(end) = assignment.end_date else {
            continue;
        };
        let days_remaining: i64 = i64::from(end.date().to_julian_day() - today.to_julian_day());
        if ASSIGNMENT_WARNING_DAYS.contains(&days_remaining) {
            sink.publish(&NotificationEvent::AssignmentEndingSoon {
                campaign_id: assignment.campaign_id,
                provider_id: assignment.provider_id,
                days_remaining,
            });
            report.assignment_alerts += 1;
        }
    }

    let campaigns: Vec<Campaign> = db.list_campaigns()?;
    for campaign in campaigns
        .iter()
        .filter(|c| c.status == CampaignStatus::Ongoing)
    {
        let days_remaining: i64 =
            i64::from(campaign.end_date.to_julian_day() - today.to_julian_day());
        if days_remaining == CAMPAIGN_WARNING_DAYS {
            sink.publish(&NotificationEvent::CampaignExpiringSoon {
                campaign_id: campaign.campaign_id,
                days_remaining,
            });
            report.campaign_alerts += 1;
        }
    }

    info!(
        assignment_alerts = report.assignment_alerts,
        campaign_alerts = report.campaign_alerts,
        "Expiry scan complete"
    );
    Ok(report)
}
