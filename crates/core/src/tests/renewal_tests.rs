// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::renewal::{
    check_renewal_source, filter_candidates, plan_successor, scheduled_assignment_end,
};
use crate::tests::helpers::{campaign, campaign_at, provider};
use camptrack_domain::{CampaignStatus, DomainError};
use std::collections::HashMap;
use time::macros::{date, datetime};

#[test]
fn test_renewal_source_must_be_finished() {
    let mut c = campaign(1, "Summer Posters");
    for status in [
        CampaignStatus::Planned,
        CampaignStatus::Ongoing,
        CampaignStatus::Cancelled,
    ] {
        c.status = status;
        assert_eq!(
            check_renewal_source(&c),
            Err(CoreError::DomainViolation(
                DomainError::RenewalSourceNotFinished {
                    campaign: String::from("Summer Posters"),
                    status,
                }
            ))
        );
    }
    c.status = CampaignStatus::Finished;
    assert!(check_renewal_source(&c).is_ok());
}

#[test]
fn test_filter_empty_candidate_set_fails() {
    let c = campaign(1, "Summer Posters");
    let result = filter_candidates(&c, &[], &HashMap::new());
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::NoRenewalCandidates {
                campaign: String::from("Summer Posters"),
            }
        ))
    );
}

#[test]
fn test_filter_splits_valid_and_skipped() {
    let c = campaign(1, "Summer Posters");
    let good = provider(7, "Kone");
    let mut wrong_service = provider(8, "Diallo");
    wrong_service.service_id = 999;
    let committed = provider(9, "Traore");
    let mut commitments: HashMap<i64, String> = HashMap::new();
    commitments.insert(9, String::from("Rival Run"));

    let split = filter_candidates(&c, &[good, wrong_service, committed], &commitments)
        .expect("one valid candidate remains");
    assert_eq!(split.valid, vec![7]);
    assert_eq!(split.skipped.len(), 2);
    assert_eq!(split.skipped[0].provider_id, 8);
    assert_eq!(split.skipped[1].provider_id, 9);
    assert!(split.skipped[1].reason.contains("Rival Run"));
}

#[test]
fn test_filter_does_not_consult_availability_flag() {
    let c = campaign(1, "Summer Posters");
    let mut p = provider(7, "Kone");
    // A stale false flag must not block renewal; commitment is re-derived
    // from assignments by the caller.
    p.available = false;
    let split = filter_candidates(&c, &[p], &HashMap::new()).expect("candidate is valid");
    assert_eq!(split.valid, vec![7]);
}

#[test]
fn test_filter_all_candidates_skipped_fails() {
    let c = campaign(1, "Summer Posters");
    let mut p = provider(7, "Kone");
    p.service_id = 999;
    let result = filter_candidates(&c, &[p], &HashMap::new());
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::AllCandidatesSkipped {
                campaign: String::from("Summer Posters"),
                considered: 1,
            }
        ))
    );
}

#[test]
fn test_successor_copies_source_fields_and_links_parent() {
    let mut source = campaign_at(1, "Summer Posters", date!(2026 - 06 - 01), date!(2026 - 06 - 30));
    source.status = CampaignStatus::Finished;
    source.supervisor = Some(String::from("sup-2"));
    let plan = plan_successor(&source, date!(2026 - 08 - 01), date!(2026 - 08 - 31), 3, &[])
        .expect("valid dates");
    assert_eq!(plan.name, "Summer Posters (Renouvellement)");
    assert_eq!(plan.client_id, source.client_id);
    assert_eq!(plan.location_id, source.location_id);
    assert_eq!(plan.service_id, source.service_id);
    assert_eq!(plan.supervisor, Some(String::from("sup-2")));
    assert_eq!(plan.target_provider_count, 3);
    assert_eq!(plan.parent_campaign_id, 1);
    assert_eq!(plan.start_date, date!(2026 - 08 - 01));
    assert_eq!(plan.end_date, date!(2026 - 08 - 31));
}

#[test]
fn test_successor_rejects_bad_dates() {
    let mut source = campaign(1, "Summer Posters");
    source.status = CampaignStatus::Finished;
    let result = plan_successor(&source, date!(2026 - 08 - 31), date!(2026 - 08 - 01), 1, &[]);
    assert!(result.is_err());
}

#[test]
fn test_successor_rejects_location_overlap() {
    let mut source = campaign_at(1, "Summer Posters", date!(2026 - 06 - 01), date!(2026 - 06 - 30));
    source.status = CampaignStatus::Finished;
    let incumbent = campaign_at(2, "Incumbent", date!(2026 - 08 - 10), date!(2026 - 08 - 20));
    let result = plan_successor(
        &source,
        date!(2026 - 08 - 01),
        date!(2026 - 08 - 31),
        1,
        &[incumbent],
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::DateOverlap { .. }))
    ));
}

#[test]
fn test_scheduled_end_adds_source_duration() {
    let source = campaign_at(1, "Summer Posters", date!(2026 - 06 - 01), date!(2026 - 06 - 30));
    let now = datetime!(2026-08-01 09:00:00 UTC);
    let end = scheduled_assignment_end(&source, now);
    assert_eq!(end, datetime!(2026-08-30 09:00:00 UTC));
}
