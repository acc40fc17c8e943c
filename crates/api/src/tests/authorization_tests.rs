// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::{AuthenticatedActor, Role, authenticate_stub};
use crate::error::{ApiError, AuthError};
use crate::handlers;
use crate::request_response::{
    AttachProviderRequest, RenewCampaignRequest, UpdateConditionRequest,
};
use crate::tests::{NOW, admin, campaign_request, controller, setup};

#[test]
fn test_authenticate_stub_succeeds_with_valid_id() {
    let result = authenticate_stub(String::from("op-123"), Role::Admin);
    assert!(result.is_ok());
    let actor: AuthenticatedActor = result.unwrap();
    assert_eq!(actor.id, "op-123");
    assert_eq!(actor.role, Role::Admin);
}

#[test]
fn test_authenticate_stub_fails_with_empty_id() {
    let result = authenticate_stub(String::new(), Role::Controller);
    assert!(matches!(
        result,
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_controller_cannot_create_campaign() {
    let mut fixture = setup();
    let request = campaign_request(&fixture, "Summer Posters", "2026-06-01", "2026-06-30");
    let result = handlers::create_campaign(&mut fixture.db, &controller(), request, NOW);
    assert_eq!(
        result,
        Err(ApiError::Unauthorized {
            action: String::from("create_campaign"),
            required_role: String::from("Admin"),
        })
    );
}

#[test]
fn test_controller_cannot_attach_provider() {
    let mut fixture = setup();
    let request = campaign_request(&fixture, "Summer Posters", "2026-06-01", "2026-06-30");
    let campaign = handlers::create_campaign(&mut fixture.db, &admin(), request, NOW)
        .unwrap()
        .campaign;
    let result = handlers::attach_provider(
        &mut fixture.db,
        &controller(),
        &fixture.sink,
        campaign.campaign_id,
        &AttachProviderRequest { provider_id: 1 },
        NOW,
    );
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    // The rejection published nothing.
    assert!(fixture.sink.events().is_empty());
}

#[test]
fn test_controller_cannot_renew_campaign() {
    let mut fixture = setup();
    let result = handlers::renew_campaign(
        &mut fixture.db,
        &controller(),
        &fixture.sink,
        1,
        &RenewCampaignRequest {
            start_date: String::from("2026-07-05"),
            end_date: String::from("2026-08-05"),
            provider_ids: None,
        },
        NOW,
    );
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_controller_cannot_override_a_penalty() {
    let mut fixture = setup();
    let result = handlers::update_condition(
        &mut fixture.db,
        &controller(),
        1,
        &UpdateConditionRequest {
            penalty_amount: Some(500),
            penalty_applied: None,
        },
        NOW,
    );
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));

    let result = handlers::delete_condition(&mut fixture.db, &controller(), 1, NOW);
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_unauthorized_check_fires_before_lookup() {
    let mut fixture = setup();
    // Campaign 404 does not exist; the role check must still win.
    let result = handlers::delete_campaign(&mut fixture.db, &controller(), 404);
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_admin_passes_the_role_gate() {
    let mut fixture = setup();
    let request = campaign_request(&fixture, "Summer Posters", "2026-06-01", "2026-06-30");
    let response = handlers::create_campaign(&mut fixture.db, &admin(), request, NOW).unwrap();
    assert_eq!(response.campaign.name, "Summer Posters");
    assert!(response.message.contains("Successfully created"));
}
