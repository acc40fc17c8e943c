// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the CampTrack back office.
//!
//! Built on Diesel with the `SQLite` backend. Every logical operation runs
//! inside one transaction: rows are read, the core rules are evaluated
//! against them, and the writes land atomically, so concurrent invocations
//! cannot interleave partial state. The unique indexes on assignment pairs,
//! payment (pair, type) triples, and provider plates back the transactional
//! checks.
//!
//! Material-condition writes are the one deliberate exception: the
//! condition commits first, and the payment reconciliation runs in its own
//! transaction afterwards, best-effort. A reconciliation failure is logged
//! and never rolls back the inspection record.
//!
//! In-memory databases receive a unique name per call via an atomic
//! counter, ensuring deterministic test isolation.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};
use tracing::error;

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::CampaignFileRow;
pub use error::PersistenceError;
pub use mutations::campaigns::NewCampaign;
pub use mutations::conditions::NewMaterialCondition;
pub use mutations::{ReleaseSweep, RenewalOutcome, TerminationSweep, UninstallationOutcome};
pub use queries::reports::UninstallationCandidate;

use camptrack::{ReconcilePlan, plan_reconciliation};
use camptrack_domain::{
    Assignment, Campaign, CampaignStatus, ClientType, MaterialCondition, Payment,
    PaymentTransaction, PaymentType, Provider, VehicleInfo,
};

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based
    /// collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    fn tx<T>(
        &mut self,
        body: impl FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        self.conn.transaction(body)
    }

    // --- Reference entities ---

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_client(
        &mut self,
        name: &str,
        client_type: ClientType,
    ) -> Result<i64, PersistenceError> {
        self.tx(|conn| mutations::reference::create_client(conn, name, client_type))
    }

    /// Creates a service category.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_service(&mut self, name: &str) -> Result<i64, PersistenceError> {
        self.tx(|conn| mutations::reference::create_service(conn, name))
    }

    /// Creates a location.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_location(&mut self, name: &str) -> Result<i64, PersistenceError> {
        self.tx(|conn| mutations::reference::create_location(conn, name))
    }

    /// Creates a provider. New providers start available.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including a duplicate plate.
    #[allow(clippy::too_many_arguments)]
    pub fn create_provider(
        &mut self,
        name: &str,
        contact: &str,
        service_id: i64,
        vehicle: &VehicleInfo,
        verification_code: Option<&str>,
        contract_valid: bool,
        gps_equipped: bool,
    ) -> Result<i64, PersistenceError> {
        self.tx(|conn| {
            mutations::reference::create_provider(
                conn,
                name,
                contact,
                service_id,
                vehicle,
                verification_code,
                contract_valid,
                gps_equipped,
            )
        })
    }

    /// Loads one provider.
    ///
    /// # Errors
    ///
    /// Returns `ProviderNotFound` if no row exists.
    pub fn get_provider(&mut self, provider_id: i64) -> Result<Provider, PersistenceError> {
        queries::providers::get_provider(&mut self.conn, provider_id)
    }

    /// Loads every provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_providers(&mut self) -> Result<Vec<Provider>, PersistenceError> {
        queries::providers::list_providers(&mut self.conn)
    }

    // --- Campaigns ---

    /// Creates a campaign in PLANNED status.
    ///
    /// # Errors
    ///
    /// Returns the violated rule, or a database error.
    pub fn create_campaign(
        &mut self,
        new: &NewCampaign,
        now: OffsetDateTime,
    ) -> Result<Campaign, PersistenceError> {
        self.tx(|conn| mutations::campaigns::create_campaign(conn, new, now))
    }

    /// Updates a campaign's date range.
    ///
    /// # Errors
    ///
    /// Returns the violated rule, or a database error.
    pub fn update_campaign_dates(
        &mut self,
        campaign_id: i64,
        start_date: Date,
        end_date: Date,
        now: OffsetDateTime,
    ) -> Result<Campaign, PersistenceError> {
        self.tx(|conn| {
            mutations::campaigns::update_campaign_dates(conn, campaign_id, start_date, end_date, now)
        })
    }

    /// Loads one campaign.
    ///
    /// # Errors
    ///
    /// Returns `CampaignNotFound` if no row exists.
    pub fn get_campaign(&mut self, campaign_id: i64) -> Result<Campaign, PersistenceError> {
        queries::campaigns::get_campaign(&mut self.conn, campaign_id)
    }

    /// Loads every campaign.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_campaigns(&mut self) -> Result<Vec<Campaign>, PersistenceError> {
        queries::campaigns::list_campaigns(&mut self.conn)
    }

    /// Transitions a campaign to a new status.
    ///
    /// # Errors
    ///
    /// Returns the violated transition rule, or a database error.
    pub fn transition_campaign(
        &mut self,
        campaign_id: i64,
        target: CampaignStatus,
        now: OffsetDateTime,
    ) -> Result<Campaign, PersistenceError> {
        self.tx(|conn| mutations::campaigns::transition_campaign(conn, campaign_id, target, now))
    }

    /// Deletes a campaign while nothing references it.
    ///
    /// # Errors
    ///
    /// Returns the violated deletion guard, or a database error.
    pub fn delete_campaign(&mut self, campaign_id: i64) -> Result<(), PersistenceError> {
        self.tx(|conn| mutations::campaigns::delete_campaign(conn, campaign_id))
    }

    /// Registers an already-uploaded document URL against a campaign.
    ///
    /// # Errors
    ///
    /// Returns `CampaignNotFound`, or a database error.
    pub fn register_campaign_file(
        &mut self,
        campaign_id: i64,
        label: &str,
        url: &str,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        self.tx(|conn| mutations::campaigns::register_campaign_file(conn, campaign_id, label, url, now))
    }

    /// Lists a campaign's registered documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_campaign_files(
        &mut self,
        campaign_id: i64,
    ) -> Result<Vec<CampaignFileRow>, PersistenceError> {
        queries::campaigns::list_campaign_files(&mut self.conn, campaign_id)
    }

    // --- Assignments ---

    /// Attaches a provider to a campaign after the eligibility gate.
    ///
    /// # Errors
    ///
    /// Returns the first violated eligibility rule, or a database error.
    pub fn attach_provider(
        &mut self,
        campaign_id: i64,
        provider_id: i64,
        now: OffsetDateTime,
    ) -> Result<Assignment, PersistenceError> {
        self.tx(|conn| mutations::assignments::attach_provider(conn, campaign_id, provider_id, now))
    }

    /// Removes a pair's assignment before settlement starts.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentNotFound`, `SettlementStarted`, or a database
    /// error.
    pub fn detach_provider(
        &mut self,
        campaign_id: i64,
        provider_id: i64,
    ) -> Result<(), PersistenceError> {
        self.tx(|conn| mutations::assignments::detach_provider(conn, campaign_id, provider_id))
    }

    /// Loads the pair's assignment.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentNotFound` if no row exists.
    pub fn get_assignment(
        &mut self,
        campaign_id: i64,
        provider_id: i64,
    ) -> Result<Assignment, PersistenceError> {
        queries::assignments::get_assignment(&mut self.conn, campaign_id, provider_id)
    }

    /// Lists a campaign's assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_assignments(
        &mut self,
        campaign_id: i64,
    ) -> Result<Vec<Assignment>, PersistenceError> {
        queries::assignments::list_for_campaign(&mut self.conn, campaign_id)
    }

    /// Lists every open assignment, for the notification scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_open_assignments(&mut self) -> Result<Vec<Assignment>, PersistenceError> {
        queries::assignments::list_open(&mut self.conn)
    }

    /// Records the installed-poster photo URL on an assignment.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentNotFound`, or a database error.
    pub fn set_poster_image(
        &mut self,
        campaign_id: i64,
        provider_id: i64,
        url: &str,
    ) -> Result<(), PersistenceError> {
        self.tx(|conn| mutations::assignments::set_poster_image(conn, campaign_id, provider_id, url))
    }

    // --- Material conditions ---

    /// Records a material condition, then best-effort reconciles the
    /// pair's BASE payment in a second transaction.
    ///
    /// # Errors
    ///
    /// Returns an error only from the primary write; a reconciliation
    /// failure is logged and swallowed.
    pub fn record_material_condition(
        &mut self,
        new: &NewMaterialCondition,
        now: OffsetDateTime,
    ) -> Result<MaterialCondition, PersistenceError> {
        let condition: MaterialCondition =
            self.tx(|conn| mutations::conditions::record_condition(conn, new, now))?;
        self.best_effort_reconcile(condition.campaign_id, condition.provider_id, now);
        Ok(condition)
    }

    /// Overrides a condition's penalty amount and/or applied flag, then
    /// best-effort reconciles.
    ///
    /// # Errors
    ///
    /// Returns an error only from the primary write.
    pub fn update_material_condition(
        &mut self,
        condition_id: i64,
        penalty_amount: Option<i64>,
        penalty_applied: Option<bool>,
        now: OffsetDateTime,
    ) -> Result<MaterialCondition, PersistenceError> {
        let condition: MaterialCondition = self.tx(|conn| {
            mutations::conditions::update_condition(conn, condition_id, penalty_amount, penalty_applied)
        })?;
        self.best_effort_reconcile(condition.campaign_id, condition.provider_id, now);
        Ok(condition)
    }

    /// Deletes a condition, then best-effort reconciles the pair it
    /// belonged to.
    ///
    /// # Errors
    ///
    /// Returns an error only from the primary write.
    pub fn delete_material_condition(
        &mut self,
        condition_id: i64,
        now: OffsetDateTime,
    ) -> Result<MaterialCondition, PersistenceError> {
        let condition: MaterialCondition =
            self.tx(|conn| mutations::conditions::delete_condition(conn, condition_id))?;
        self.best_effort_reconcile(condition.campaign_id, condition.provider_id, now);
        Ok(condition)
    }

    /// Lists the conditions recorded against a pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_material_conditions(
        &mut self,
        campaign_id: i64,
        provider_id: i64,
    ) -> Result<Vec<MaterialCondition>, PersistenceError> {
        queries::conditions::list_for_pair(&mut self.conn, campaign_id, provider_id)
    }

    /// Runs reconciliation in its own transaction when both references
    /// are present, logging any failure instead of propagating it. The
    /// primary write has already committed.
    fn best_effort_reconcile(
        &mut self,
        campaign_id: Option<i64>,
        provider_id: Option<i64>,
        now: OffsetDateTime,
    ) {
        let (Some(campaign_id), Some(provider_id)) = (campaign_id, provider_id) else {
            return;
        };
        if let Err(e) =
            self.tx(|conn| mutations::payments::reconcile_payment(conn, campaign_id, provider_id, now))
        {
            error!(
                campaign_id,
                provider_id,
                error = %e,
                "Payment reconciliation failed after condition write"
            );
        }
    }

    // --- Payments ---

    /// Recomputes a pair's BASE payment from its material conditions.
    ///
    /// # Errors
    ///
    /// Returns `CampaignNotFound`/`ProviderNotFound`, or a database error.
    pub fn reconcile_payment(
        &mut self,
        campaign_id: i64,
        provider_id: i64,
        now: OffsetDateTime,
    ) -> Result<Payment, PersistenceError> {
        self.tx(|conn| mutations::payments::reconcile_payment(conn, campaign_id, provider_id, now))
    }

    /// Read-only reconciliation preview: what the pair's BASE payment
    /// would hold after a reconcile, without writing anything.
    ///
    /// # Errors
    ///
    /// Returns `CampaignNotFound`/`ProviderNotFound`, or a database error.
    pub fn preview_reconciliation(
        &mut self,
        campaign_id: i64,
        provider_id: i64,
    ) -> Result<ReconcilePlan, PersistenceError> {
        let conn: &mut SqliteConnection = &mut self.conn;
        let campaign: Campaign = queries::campaigns::get_campaign(conn, campaign_id)?;
        queries::providers::get_provider(conn, provider_id)?;
        let client_type: ClientType =
            queries::campaigns::client_type_for_campaign(conn, &campaign)?;
        let conditions: Vec<MaterialCondition> =
            queries::conditions::list_for_pair(conn, campaign_id, provider_id)?;
        let existing: Option<Payment> =
            queries::payments::find_payment(conn, campaign_id, provider_id, PaymentType::Base)?;
        Ok(plan_reconciliation(client_type, &conditions, existing.as_ref()))
    }

    /// Records a settlement transaction and re-derives the payment
    /// status.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound`, `NonPositiveAmount`, or a database
    /// error.
    #[allow(clippy::too_many_arguments)]
    pub fn record_payment_transaction(
        &mut self,
        payment_id: i64,
        amount: i64,
        method: &str,
        reference: Option<&str>,
        note: Option<&str>,
        recorded_by: &str,
        now: OffsetDateTime,
    ) -> Result<Payment, PersistenceError> {
        self.tx(|conn| {
            mutations::payments::record_transaction(
                conn, payment_id, amount, method, reference, note, recorded_by, now,
            )
        })
    }

    /// Loads one payment.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if no row exists.
    pub fn get_payment(&mut self, payment_id: i64) -> Result<Payment, PersistenceError> {
        queries::payments::get_payment(&mut self.conn, payment_id)
    }

    /// Lists every payment for a pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_payments_for_pair(
        &mut self,
        campaign_id: i64,
        provider_id: i64,
    ) -> Result<Vec<Payment>, PersistenceError> {
        queries::payments::list_for_pair(&mut self.conn, campaign_id, provider_id)
    }

    /// Lists a payment's transactions in recording order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_payment_transactions(
        &mut self,
        payment_id: i64,
    ) -> Result<Vec<PaymentTransaction>, PersistenceError> {
        queries::payments::list_transactions(&mut self.conn, payment_id)
    }

    // --- Sweeps ---

    /// Finishes every campaign past its end date and releases its
    /// providers. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if any read or write fails; nothing is partially
    /// applied.
    pub fn auto_terminate(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<TerminationSweep, PersistenceError> {
        self.tx(|conn| mutations::sweeps::auto_terminate(conn, now))
    }

    /// Closes every open assignment whose scheduled end has passed.
    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if any read or write fails; nothing is partially
    /// applied.
    pub fn auto_release(&mut self, now: OffsetDateTime) -> Result<ReleaseSweep, PersistenceError> {
        self.tx(|conn| mutations::sweeps::auto_release(conn, now))
    }

    // --- Renewal ---

    /// Renews a finished campaign into a PLANNED successor.
    ///
    /// # Errors
    ///
    /// Returns the violated renewal rule, or a database error.
    pub fn renew_campaign(
        &mut self,
        campaign_id: i64,
        new_start: Date,
        new_end: Date,
        provider_subset: Option<&[i64]>,
        now: OffsetDateTime,
    ) -> Result<RenewalOutcome, PersistenceError> {
        self.tx(|conn| {
            mutations::renewal::renew_campaign(conn, campaign_id, new_start, new_end, provider_subset, now)
        })
    }

    // --- Uninstallation ---

    /// Confirms a provider's de-installation and issues the fixed fee.
    ///
    /// # Errors
    ///
    /// Returns the violated confirmation rule, or a database error.
    pub fn confirm_uninstallation(
        &mut self,
        campaign_id: i64,
        provider_id: i64,
        now: OffsetDateTime,
    ) -> Result<UninstallationOutcome, PersistenceError> {
        self.tx(|conn| mutations::uninstall::confirm_uninstallation(conn, campaign_id, provider_id, now))
    }

    /// Lists the assignments eligible for de-installation confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails.
    pub fn list_uninstallation_eligible(
        &mut self,
        today: Date,
    ) -> Result<Vec<UninstallationCandidate>, PersistenceError> {
        queries::reports::list_uninstallation_eligible(&mut self.conn, today)
    }
}
