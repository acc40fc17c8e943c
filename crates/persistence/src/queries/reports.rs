// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cross-entity read models for the back-office views.

use diesel::SqliteConnection;
use time::Date;

use crate::error::PersistenceError;
use crate::queries;
use camptrack::uninstallation_open;
use camptrack_domain::{Assignment, Campaign, Payment, PaymentType, Provider};

/// One assignment eligible for de-installation confirmation, with the
/// detail the field team needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallationCandidate {
    pub campaign: Campaign,
    pub provider: Provider,
    pub assignment: Assignment,
    /// The fee payment, present once confirmation has happened.
    pub deinstallation_payment: Option<Payment>,
}

/// Lists every assignment on a campaign that is FINISHED or past its end
/// date, so the field team can walk the confirmations.
///
/// # Errors
///
/// Returns an error if any read fails.
pub fn list_uninstallation_eligible(
    conn: &mut SqliteConnection,
    today: Date,
) -> Result<Vec<UninstallationCandidate>, PersistenceError> {
    let mut candidates: Vec<UninstallationCandidate> = Vec::new();
    for campaign in queries::campaigns::list_campaigns(conn)? {
        if !uninstallation_open(&campaign, today) {
            continue;
        }
        for assignment in queries::assignments::list_for_campaign(conn, campaign.campaign_id)? {
            let provider: Provider =
                queries::providers::get_provider(conn, assignment.provider_id)?;
            let deinstallation_payment: Option<Payment> = queries::payments::find_payment(
                conn,
                campaign.campaign_id,
                assignment.provider_id,
                PaymentType::Deinstallation,
            )?;
            candidates.push(UninstallationCandidate {
                campaign: campaign.clone(),
                provider,
                assignment,
                deinstallation_payment,
            });
        }
    }
    Ok(candidates)
}
