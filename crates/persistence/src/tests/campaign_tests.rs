// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::PersistenceError;
use crate::tests::{NOW, new_campaign, seed_campaign, seed_provider, setup};
use camptrack_domain::{CampaignStatus, DomainError};
use time::macros::date;

#[test]
fn test_create_campaign_starts_planned() {
    let mut fixture = setup();
    let campaign = seed_campaign(
        &mut fixture,
        "Summer Posters",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    assert_eq!(campaign.status, CampaignStatus::Planned);
    assert_eq!(campaign.parent_campaign_id, None);
    assert_eq!(campaign.created_at, "2026-06-01T09:00:00Z");
    assert_eq!(campaign.duration_days(), 29);
}

#[test]
fn test_create_campaign_rejects_bad_dates() {
    let mut fixture = setup();
    let new = new_campaign(
        &fixture,
        "Backwards",
        date!(2026 - 06 - 30),
        date!(2026 - 06 - 01),
    );
    let result = fixture.db.create_campaign(&new, NOW);
    assert!(matches!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::EndDateNotAfterStart { .. }
        ))
    ));
}

#[test]
fn test_create_campaign_rejects_unknown_client() {
    let mut fixture = setup();
    let mut new = new_campaign(
        &fixture,
        "Orphan",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    new.client_id = 999;
    let result = fixture.db.create_campaign(&new, NOW);
    assert_eq!(result, Err(PersistenceError::ClientNotFound(999)));
}

#[test]
fn test_location_exclusivity_rejects_overlap() {
    let mut fixture = setup();
    seed_campaign(
        &mut fixture,
        "Incumbent",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    let new = new_campaign(
        &fixture,
        "Intruder",
        date!(2026 - 06 - 15),
        date!(2026 - 07 - 15),
    );
    let result = fixture.db.create_campaign(&new, NOW);
    match result {
        Err(PersistenceError::DomainViolation(DomainError::DateOverlap {
            other_campaign, ..
        })) => assert_eq!(other_campaign, "Incumbent"),
        other => panic!("expected DateOverlap, got {other:?}"),
    }
}

#[test]
fn test_location_exclusivity_allows_other_location() {
    let mut fixture = setup();
    seed_campaign(
        &mut fixture,
        "Incumbent",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    let other_location = fixture.db.create_location("Abidjan - Cocody").unwrap();
    let mut new = new_campaign(
        &fixture,
        "Neighbour",
        date!(2026 - 06 - 15),
        date!(2026 - 07 - 15),
    );
    new.location_id = other_location;
    assert!(fixture.db.create_campaign(&new, NOW).is_ok());
}

#[test]
fn test_location_exclusivity_allows_disjoint_ranges() {
    let mut fixture = setup();
    seed_campaign(
        &mut fixture,
        "June",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    let new = new_campaign(
        &fixture,
        "July",
        date!(2026 - 07 - 01),
        date!(2026 - 07 - 31),
    );
    assert!(fixture.db.create_campaign(&new, NOW).is_ok());
}

#[test]
fn test_update_dates_does_not_collide_with_itself() {
    let mut fixture = setup();
    let campaign = seed_campaign(
        &mut fixture,
        "Movable",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    let updated = fixture
        .db
        .update_campaign_dates(
            campaign.campaign_id,
            date!(2026 - 06 - 05),
            date!(2026 - 07 - 05),
            NOW,
        )
        .unwrap();
    assert_eq!(updated.start_date, date!(2026 - 06 - 05));
    assert_eq!(updated.end_date, date!(2026 - 07 - 05));
}

#[test]
fn test_transition_to_ongoing_requires_assignment() {
    let mut fixture = setup();
    let campaign = seed_campaign(
        &mut fixture,
        "Unstaffed",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    let result = fixture
        .db
        .transition_campaign(campaign.campaign_id, CampaignStatus::Ongoing, NOW);
    assert!(matches!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::TransitionRequiresAssignments { .. }
        ))
    ));

    let provider_id = seed_provider(&mut fixture, "Kone");
    fixture
        .db
        .attach_provider(campaign.campaign_id, provider_id, NOW)
        .unwrap();
    let ongoing = fixture
        .db
        .transition_campaign(campaign.campaign_id, CampaignStatus::Ongoing, NOW)
        .unwrap();
    assert_eq!(ongoing.status, CampaignStatus::Ongoing);
}

#[test]
fn test_invalid_transition_names_the_pair() {
    let mut fixture = setup();
    let campaign = seed_campaign(
        &mut fixture,
        "Planned",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    let result = fixture
        .db
        .transition_campaign(campaign.campaign_id, CampaignStatus::Finished, NOW);
    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: CampaignStatus::Planned,
                to: CampaignStatus::Finished,
            }
        ))
    );
}

#[test]
fn test_cancelling_releases_attached_providers() {
    let mut fixture = setup();
    let campaign = seed_campaign(
        &mut fixture,
        "Doomed",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    let provider_id = seed_provider(&mut fixture, "Kone");
    fixture
        .db
        .attach_provider(campaign.campaign_id, provider_id, NOW)
        .unwrap();
    assert!(!fixture.db.get_provider(provider_id).unwrap().available);

    fixture
        .db
        .transition_campaign(campaign.campaign_id, CampaignStatus::Cancelled, NOW)
        .unwrap();
    assert!(fixture.db.get_provider(provider_id).unwrap().available);
}

#[test]
fn test_delete_guards() {
    let mut fixture = setup();
    let campaign = seed_campaign(
        &mut fixture,
        "Deletable",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );

    fixture
        .db
        .register_campaign_file(campaign.campaign_id, "contract", "https://files/contract.pdf", NOW)
        .unwrap();
    let result = fixture.db.delete_campaign(campaign.campaign_id);
    assert!(matches!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::CampaignHasFiles { .. }
        ))
    ));
}

#[test]
fn test_delete_clean_campaign_succeeds() {
    let mut fixture = setup();
    let campaign = seed_campaign(
        &mut fixture,
        "Deletable",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    fixture.db.delete_campaign(campaign.campaign_id).unwrap();
    assert_eq!(
        fixture.db.get_campaign(campaign.campaign_id),
        Err(PersistenceError::CampaignNotFound(campaign.campaign_id))
    );
}

#[test]
fn test_register_file_on_missing_campaign_fails() {
    let mut fixture = setup();
    let result = fixture
        .db
        .register_campaign_file(404, "contract", "https://files/contract.pdf", NOW);
    assert_eq!(result, Err(PersistenceError::CampaignNotFound(404)));
}
