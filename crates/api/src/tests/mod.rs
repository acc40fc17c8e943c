// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod authorization_tests;

use crate::auth::{AuthenticatedActor, Role};
use crate::request_response::CreateCampaignRequest;
use camptrack_domain::{ClientType, VehicleInfo};
use camptrack_notify::MemorySink;
use camptrack_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

pub const NOW: OffsetDateTime = datetime!(2026-06-01 09:00:00 UTC);

/// A seeded database plus a memory sink for asserting notifications.
pub struct Fixture {
    pub db: Persistence,
    pub sink: MemorySink,
    pub client_id: i64,
    pub service_id: i64,
    pub location_id: i64,
}

pub fn setup() -> Fixture {
    let mut db = Persistence::new_in_memory().unwrap();
    let client_id = db.create_client("Orange CI", ClientType::External).unwrap();
    let service_id = db.create_service("Mobile billboard").unwrap();
    let location_id = db.create_location("Abidjan - Plateau").unwrap();
    Fixture {
        db,
        sink: MemorySink::new(),
        client_id,
        service_id,
        location_id,
    }
}

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-1"), Role::Admin)
}

pub fn controller() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("controller-1"), Role::Controller)
}

pub fn campaign_request(fixture: &Fixture, name: &str, start: &str, end: &str) -> CreateCampaignRequest {
    CreateCampaignRequest {
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
        kind: String::from("MASS"),
        start_date: String::from(start),
        end_date: String::from(end),
    }
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
