// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared entity builders for the rule tests.

use camptrack_domain::{
    Assignment, AssignmentStatus, Campaign, CampaignKind, CampaignStatus, MaterialCondition,
    MaterialGrade, Payment, PaymentStatus, PaymentType, Provider, VehicleInfo,
};
use time::Date;
use time::macros::date;

pub fn campaign(campaign_id: i64, name: &str) -> Campaign {
    Campaign {
        campaign_id,
        name: String::from(name),
        description: Some(String::from("poster run")),
        objective: None,
        client_id: 1,
        location_id: 10,
        service_id: 100,
        manager: String::from("mgr-1"),
        supervisor: None,
        target_quantity: 50,
        target_provider_count: None,
        kind: CampaignKind::Mass,
        start_date: date!(2026 - 06 - 01),
        end_date: date!(2026 - 06 - 30),
        status: CampaignStatus::Planned,
        parent_campaign_id: None,
        created_at: String::from("2026-05-20T08:00:00Z"),
        updated_at: String::from("2026-05-20T08:00:00Z"),
    }
}

pub fn campaign_at(campaign_id: i64, name: &str, start: Date, end: Date) -> Campaign {
    let mut c = campaign(campaign_id, name);
    c.start_date = start;
    c.end_date = end;
    c
}

pub fn provider(provider_id: i64, name: &str) -> Provider {
    Provider {
        provider_id,
        name: String::from(name),
        contact: String::from("+225-0102030405"),
        service_id: 100,
        available: true,
        vehicle: VehicleInfo::default(),
        verification_code: None,
        contract_valid: true,
        gps_equipped: false,
    }
}

pub fn assignment(campaign_id: i64, provider_id: i64) -> Assignment {
    Assignment {
        campaign_id,
        provider_id,
        status: AssignmentStatus::Active,
        created_at: String::from("2026-06-01T08:00:00Z"),
        end_date: None,
        deinstalled_at: None,
        poster_image: None,
    }
}

pub fn base_payment_row(payment_id: i64, campaign_id: i64, provider_id: i64) -> Payment {
    Payment {
        payment_id,
        campaign_id,
        provider_id,
        payment_type: PaymentType::Base,
        base_amount: 5000,
        sanction_amount: 0,
        final_amount: 5000,
        status: PaymentStatus::Pending,
        is_paid: false,
        paid_at: None,
        created_at: String::from("2026-06-01T08:00:00Z"),
    }
}

pub fn bad_condition(condition_id: i64, penalty_amount: i64, applied: bool) -> MaterialCondition {
    MaterialCondition {
        condition_id,
        campaign_id: Some(1),
        provider_id: Some(1),
        material_name: String::from("side panel"),
        grade: MaterialGrade::Bad,
        description: None,
        penalty_amount,
        penalty_applied: applied,
        photo_url: None,
        created_at: String::from("2026-06-10T10:00:00Z"),
    }
}
