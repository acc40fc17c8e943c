// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod campaign_tests;
mod payment_tests;
mod renewal_tests;

use crate::{NewCampaign, Persistence};
use camptrack_domain::{Campaign, CampaignKind, CampaignStatus, ClientType, VehicleInfo};
use time::macros::datetime;
use time::{Date, OffsetDateTime};

pub const NOW: OffsetDateTime = datetime!(2026-06-01 09:00:00 UTC);

/// A seeded database with one client, service, and location.
pub struct Fixture {
    pub db: Persistence,
    pub client_id: i64,
    pub service_id: i64,
    pub location_id: i64,
}

pub fn setup_with_client(client_type: ClientType) -> Fixture {
    let mut db = Persistence::new_in_memory().unwrap();
    let client_id = db.create_client("Orange CI", client_type).unwrap();
    let service_id = db.create_service("Mobile billboard").unwrap();
    let location_id = db.create_location("Abidjan - Plateau").unwrap();
    Fixture {
        db,
        client_id,
        service_id,
        location_id,
    }
}

pub fn setup() -> Fixture {
    setup_with_client(ClientType::External)
}

pub fn new_campaign(fixture: &Fixture, name: &str, start: Date, end: Date) -> NewCampaign {
    NewCampaign {
        name: String::from(name),
        description: Some(String::from("poster run")),
        objective: None,
        client_id: fixture.client_id,
        location_id: fixture.location_id,
        service_id: fixture.service_id,
        manager: String::from("mgr-1"),
        supervisor: None,
        target_quantity: 50,
        target_provider_count: None,
        kind: CampaignKind::Mass,
        start_date: start,
        end_date: end,
    }
}

pub fn seed_campaign(fixture: &mut Fixture, name: &str, start: Date, end: Date) -> Campaign {
    let new = new_campaign(fixture, name, start, end);
    fixture.db.create_campaign(&new, NOW).unwrap()
}

pub fn seed_provider(fixture: &mut Fixture, name: &str) -> i64 {
    fixture
        .db
        .create_provider(
            name,
            "+225-0102030405",
            fixture.service_id,
            &VehicleInfo::default(),
            None,
            true,
            false,
        )
        .unwrap()
}

/// Attaches a provider and walks the campaign to ONGOING.
pub fn seed_running_campaign(
    fixture: &mut Fixture,
    name: &str,
    start: Date,
    end: Date,
) -> (Campaign, i64) {
    let campaign = seed_campaign(fixture, name, start, end);
    let provider_id = seed_provider(fixture, &format!("{name} provider"));
    fixture
        .db
        .attach_provider(campaign.campaign_id, provider_id, NOW)
        .unwrap();
    let campaign = fixture
        .db
        .transition_campaign(campaign.campaign_id, CampaignStatus::Ongoing, NOW)
        .unwrap();
    (campaign, provider_id)
}
