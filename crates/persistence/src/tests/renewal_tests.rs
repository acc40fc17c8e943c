// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::PersistenceError;
use crate::tests::{
    Fixture, NOW, new_campaign, seed_provider, seed_running_campaign, setup,
};
use camptrack_domain::{AssignmentStatus, Campaign, CampaignStatus, DomainError};
use time::macros::{date, datetime};

fn finished_campaign(fixture: &mut Fixture) -> (Campaign, i64) {
    let (campaign, provider_id) = seed_running_campaign(
        fixture,
        "June Run",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    let campaign = fixture
        .db
        .transition_campaign(campaign.campaign_id, CampaignStatus::Finished, NOW)
        .unwrap();
    (campaign, provider_id)
}

#[test]
fn test_renewal_creates_planned_successor() {
    let mut fixture = setup();
    let (source, provider_id) = finished_campaign(&mut fixture);

    let outcome = fixture
        .db
        .renew_campaign(
            source.campaign_id,
            date!(2026 - 07 - 05),
            date!(2026 - 08 - 05),
            None,
            NOW,
        )
        .unwrap();

    let successor = &outcome.campaign;
    assert_eq!(successor.name, "June Run (Renouvellement)");
    assert_eq!(successor.status, CampaignStatus::Planned);
    assert_eq!(successor.parent_campaign_id, Some(source.campaign_id));
    assert_eq!(successor.start_date, date!(2026 - 07 - 05));
    assert_eq!(successor.end_date, date!(2026 - 08 - 05));
    assert_eq!(successor.target_provider_count, Some(1));
    assert_eq!(outcome.attached_count, 1);
    assert!(outcome.skipped.is_empty());

    let assignment = fixture
        .db
        .get_assignment(successor.campaign_id, provider_id)
        .unwrap();
    assert_eq!(assignment.status, AssignmentStatus::ScheduledEnd);
    // Scheduled end is NOW plus the source's 29-day duration.
    assert_eq!(assignment.end_date, Some(datetime!(2026-06-30 09:00:00 UTC)));
    assert!(!fixture.db.get_provider(provider_id).unwrap().available);
}

#[test]
fn test_renewal_requires_finished_source() {
    let mut fixture = setup();
    let (campaign, _) = seed_running_campaign(
        &mut fixture,
        "Still Going",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );

    let result = fixture.db.renew_campaign(
        campaign.campaign_id,
        date!(2026 - 07 - 05),
        date!(2026 - 08 - 05),
        None,
        NOW,
    );
    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::RenewalSourceNotFinished {
                campaign: String::from("Still Going"),
                status: CampaignStatus::Ongoing,
            }
        ))
    );
}

#[test]
fn test_renewal_with_empty_subset_fails() {
    let mut fixture = setup();
    let (source, _) = finished_campaign(&mut fixture);

    let result = fixture.db.renew_campaign(
        source.campaign_id,
        date!(2026 - 07 - 05),
        date!(2026 - 08 - 05),
        Some(&[999]),
        NOW,
    );
    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::NoRenewalCandidates {
                campaign: String::from("June Run"),
            }
        ))
    );
}

#[test]
fn test_renewal_skips_committed_provider() {
    let mut fixture = setup();
    let source = crate::tests::seed_campaign(
        &mut fixture,
        "June Run",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    let first = seed_provider(&mut fixture, "Kone");
    let second = seed_provider(&mut fixture, "Diallo");
    fixture
        .db
        .attach_provider(source.campaign_id, first, NOW)
        .unwrap();
    fixture
        .db
        .attach_provider(source.campaign_id, second, NOW)
        .unwrap();
    fixture
        .db
        .transition_campaign(source.campaign_id, CampaignStatus::Ongoing, NOW)
        .unwrap();
    fixture
        .db
        .transition_campaign(source.campaign_id, CampaignStatus::Finished, NOW)
        .unwrap();

    // The first provider has since committed to another campaign.
    let other_location = fixture.db.create_location("Abidjan - Treichville").unwrap();
    let mut elsewhere = new_campaign(
        &fixture,
        "Elsewhere",
        date!(2026 - 07 - 01),
        date!(2026 - 07 - 31),
    );
    elsewhere.location_id = other_location;
    let elsewhere = fixture.db.create_campaign(&elsewhere, NOW).unwrap();
    fixture
        .db
        .attach_provider(elsewhere.campaign_id, first, NOW)
        .unwrap();

    let outcome = fixture
        .db
        .renew_campaign(
            source.campaign_id,
            date!(2026 - 08 - 10),
            date!(2026 - 09 - 10),
            None,
            NOW,
        )
        .unwrap();
    assert_eq!(outcome.attached_count, 1);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].provider_id, first);
    assert_eq!(
        outcome.skipped[0].reason,
        "committed to campaign 'Elsewhere'"
    );
    assert_eq!(outcome.campaign.target_provider_count, Some(1));
    assert!(
        fixture
            .db
            .get_assignment(outcome.campaign.campaign_id, second)
            .is_ok()
    );
}

#[test]
fn test_renewal_fails_when_every_candidate_is_skipped() {
    let mut fixture = setup();
    let (source, provider_id) = finished_campaign(&mut fixture);

    let other_location = fixture.db.create_location("Abidjan - Marcory").unwrap();
    let mut elsewhere = new_campaign(
        &fixture,
        "Elsewhere",
        date!(2026 - 07 - 01),
        date!(2026 - 07 - 31),
    );
    elsewhere.location_id = other_location;
    let elsewhere = fixture.db.create_campaign(&elsewhere, NOW).unwrap();
    fixture
        .db
        .attach_provider(elsewhere.campaign_id, provider_id, NOW)
        .unwrap();

    let result = fixture.db.renew_campaign(
        source.campaign_id,
        date!(2026 - 08 - 10),
        date!(2026 - 09 - 10),
        None,
        NOW,
    );
    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::AllCandidatesSkipped {
                campaign: String::from("June Run"),
                considered: 1,
            }
        ))
    );
    // Nothing was written: the source has no successor.
    assert!(
        fixture
            .db
            .list_campaigns()
            .unwrap()
            .iter()
            .all(|c| c.parent_campaign_id.is_none())
    );
}

#[test]
fn test_renewal_rejects_overlap_with_the_location() {
    let mut fixture = setup();
    let (source, _) = finished_campaign(&mut fixture);

    // The source itself still occupies June at this location.
    let result = fixture.db.renew_campaign(
        source.campaign_id,
        date!(2026 - 06 - 15),
        date!(2026 - 07 - 15),
        None,
        NOW,
    );
    assert!(matches!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::DateOverlap { .. }
        ))
    ));
}
