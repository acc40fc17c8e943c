// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{Fixture, NOW, seed_provider, seed_running_campaign, setup, setup_with_client};
use crate::{NewMaterialCondition, PersistenceError};
use camptrack_domain::{
    ClientType, DomainError, MaterialGrade, Payment, PaymentStatus, PaymentType,
};
use time::macros::date;

fn pair(fixture: &mut Fixture) -> (i64, i64) {
    let (campaign, provider_id) = seed_running_campaign(
        fixture,
        "Summer Posters",
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 30),
    );
    (campaign.campaign_id, provider_id)
}

fn bad_condition(campaign_id: i64, provider_id: i64) -> NewMaterialCondition {
    NewMaterialCondition {
        campaign_id: Some(campaign_id),
        provider_id: Some(provider_id),
        material_name: String::from("Tricycle frame"),
        grade: MaterialGrade::Bad,
        description: None,
        penalty_amount: None,
        penalty_applied: None,
        photo_url: None,
    }
}

#[test]
fn test_reconcile_creates_base_payment_lazily() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);

    assert!(fixture
        .db
        .list_payments_for_pair(campaign_id, provider_id)
        .unwrap()
        .is_empty());

    let payment = fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();
    assert_eq!(payment.payment_type, PaymentType::Base);
    assert_eq!(payment.base_amount, 5000);
    assert_eq!(payment.sanction_amount, 0);
    assert_eq!(payment.final_amount, 5000);
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(!payment.is_paid);
    assert_eq!(payment.paid_at, None);
}

#[test]
fn test_internal_client_uses_internal_tariff() {
    let mut fixture = setup_with_client(ClientType::Internal);
    let (campaign_id, provider_id) = pair(&mut fixture);

    let condition = fixture
        .db
        .record_material_condition(&bad_condition(campaign_id, provider_id), NOW)
        .unwrap();
    assert_eq!(condition.penalty_amount, 1000);
    assert!(condition.penalty_applied);

    let payment = fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();
    assert_eq!(payment.base_amount, 3000);
    assert_eq!(payment.sanction_amount, 1000);
    assert_eq!(payment.final_amount, 2000);
}

#[test]
fn test_bad_condition_reconciles_the_pair_automatically() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);

    let condition = fixture
        .db
        .record_material_condition(&bad_condition(campaign_id, provider_id), NOW)
        .unwrap();
    assert_eq!(condition.penalty_amount, 2000);
    assert!(condition.penalty_applied);

    // The condition write already triggered reconciliation.
    let payments = fixture
        .db
        .list_payments_for_pair(campaign_id, provider_id)
        .unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].base_amount, 5000);
    assert_eq!(payments[0].sanction_amount, 2000);
    assert_eq!(payments[0].final_amount, 3000);
}

#[test]
fn test_explicit_penalty_override_wins() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);

    let mut new = bad_condition(campaign_id, provider_id);
    new.penalty_amount = Some(750);
    let condition = fixture.db.record_material_condition(&new, NOW).unwrap();
    assert_eq!(condition.penalty_amount, 750);

    let payment = fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();
    assert_eq!(payment.sanction_amount, 750);
    assert_eq!(payment.final_amount, 4250);
}

#[test]
fn test_unapplied_penalty_is_excluded() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);

    let mut new = bad_condition(campaign_id, provider_id);
    new.penalty_applied = Some(false);
    fixture.db.record_material_condition(&new, NOW).unwrap();

    let payment = fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();
    assert_eq!(payment.sanction_amount, 0);
    assert_eq!(payment.final_amount, 5000);
}

#[test]
fn test_good_condition_without_campaign_carries_no_penalty() {
    let mut fixture = setup();
    let provider_id = seed_provider(&mut fixture, "Kone");

    let condition = fixture
        .db
        .record_material_condition(
            &NewMaterialCondition {
                campaign_id: None,
                provider_id: Some(provider_id),
                material_name: String::from("Banner"),
                grade: MaterialGrade::Good,
                description: Some(String::from("routine check")),
                penalty_amount: None,
                penalty_applied: None,
                photo_url: None,
            },
            NOW,
        )
        .unwrap();
    assert_eq!(condition.penalty_amount, 0);
    assert!(!condition.penalty_applied);
}

#[test]
fn test_final_amount_clamps_at_zero() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);

    for _ in 0..3 {
        fixture
            .db
            .record_material_condition(&bad_condition(campaign_id, provider_id), NOW)
            .unwrap();
    }

    let payment = fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();
    assert_eq!(payment.sanction_amount, 6000);
    assert_eq!(payment.final_amount, 0);
}

#[test]
fn test_updating_a_condition_re_reconciles() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);

    let condition = fixture
        .db
        .record_material_condition(&bad_condition(campaign_id, provider_id), NOW)
        .unwrap();
    fixture
        .db
        .update_material_condition(condition.condition_id, Some(500), None, NOW)
        .unwrap();

    let payments = fixture
        .db
        .list_payments_for_pair(campaign_id, provider_id)
        .unwrap();
    assert_eq!(payments[0].sanction_amount, 500);
    assert_eq!(payments[0].final_amount, 4500);
}

#[test]
fn test_deleting_a_condition_re_reconciles() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);

    let condition = fixture
        .db
        .record_material_condition(&bad_condition(campaign_id, provider_id), NOW)
        .unwrap();
    let removed = fixture
        .db
        .delete_material_condition(condition.condition_id, NOW)
        .unwrap();
    assert_eq!(removed.condition_id, condition.condition_id);

    let payments = fixture
        .db
        .list_payments_for_pair(campaign_id, provider_id)
        .unwrap();
    assert_eq!(payments[0].sanction_amount, 0);
    assert_eq!(payments[0].final_amount, 5000);
    assert!(fixture
        .db
        .list_material_conditions(campaign_id, provider_id)
        .unwrap()
        .is_empty());
}

#[test]
fn test_preview_does_not_write() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);

    let plan = fixture
        .db
        .preview_reconciliation(campaign_id, provider_id)
        .unwrap();
    assert_eq!(plan.payment_id, None);
    assert_eq!(plan.base, 5000);
    assert_eq!(plan.sanction, 0);
    assert_eq!(plan.final_amount, 5000);
    assert!(fixture
        .db
        .list_payments_for_pair(campaign_id, provider_id)
        .unwrap()
        .is_empty());
}

#[test]
fn test_transaction_progression_settles_the_payment() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);
    fixture
        .db
        .record_material_condition(&bad_condition(campaign_id, provider_id), NOW)
        .unwrap();
    let payment = fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();
    assert_eq!(payment.final_amount, 3000);

    let partial: Payment = fixture
        .db
        .record_payment_transaction(payment.payment_id, 1000, "cash", None, None, "admin", NOW)
        .unwrap();
    assert_eq!(partial.status, PaymentStatus::Partial);
    assert!(!partial.is_paid);
    assert_eq!(partial.paid_at, None);

    let settled: Payment = fixture
        .db
        .record_payment_transaction(
            payment.payment_id,
            2000,
            "mobile_money",
            Some("MM-123"),
            None,
            "admin",
            NOW,
        )
        .unwrap();
    assert_eq!(settled.status, PaymentStatus::Paid);
    assert!(settled.is_paid);
    assert_eq!(settled.paid_at, Some(String::from("2026-06-01T09:00:00Z")));

    let transactions = fixture
        .db
        .list_payment_transactions(payment.payment_id)
        .unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].amount, 1000);
    assert_eq!(transactions[1].reference, Some(String::from("MM-123")));
}

#[test]
fn test_reconcile_re_derives_status_from_the_transaction_sum() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);

    // No transactions yet: the empty sum folds to zero and the payment
    // stays Pending across repeated reconciliations.
    fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();
    let payment = fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(!payment.is_paid);

    // A partial sum survives a later reconciliation unchanged.
    fixture
        .db
        .record_payment_transaction(payment.payment_id, 2000, "cash", None, None, "admin", NOW)
        .unwrap();
    let reconciled = fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();
    assert_eq!(reconciled.status, PaymentStatus::Partial);
    assert_eq!(reconciled.final_amount, 5000);
}

#[test]
fn test_paid_at_is_stamped_once() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);
    let payment = fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();

    let settled = fixture
        .db
        .record_payment_transaction(payment.payment_id, 5000, "cash", None, None, "admin", NOW)
        .unwrap();
    let first_paid_at = settled.paid_at.clone();
    assert!(first_paid_at.is_some());

    let later = NOW + time::Duration::days(3);
    let overpaid = fixture
        .db
        .record_payment_transaction(payment.payment_id, 500, "cash", None, None, "admin", later)
        .unwrap();
    assert_eq!(overpaid.status, PaymentStatus::Paid);
    assert_eq!(overpaid.paid_at, first_paid_at);
}

#[test]
fn test_non_positive_transaction_amount_rejected() {
    let mut fixture = setup();
    let (campaign_id, provider_id) = pair(&mut fixture);
    let payment = fixture
        .db
        .reconcile_payment(campaign_id, provider_id, NOW)
        .unwrap();

    let result =
        fixture
            .db
            .record_payment_transaction(payment.payment_id, 0, "cash", None, None, "admin", NOW);
    assert_eq!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::NonPositiveAmount { amount: 0 }
        ))
    );
}

#[test]
fn test_transaction_on_missing_payment_fails() {
    let mut fixture = setup();
    let result = fixture
        .db
        .record_payment_transaction(404, 1000, "cash", None, None, "admin", NOW);
    assert_eq!(result, Err(PersistenceError::PaymentNotFound(404)));
}
