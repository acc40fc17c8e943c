// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Material-condition mutations.
//!
//! These only touch the condition rows; the caller re-reconciles the
//! pair's BASE payment in a separate best-effort transaction after the
//! primary write commits.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::info;

use crate::diesel_schema::material_conditions;
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;
use camptrack_domain::{
    Campaign, ClientType, MaterialCondition, MaterialGrade, default_penalty, format_timestamp,
};

/// Input for recording a material condition.
#[derive(Debug, Clone)]
pub struct NewMaterialCondition {
    pub campaign_id: Option<i64>,
    pub provider_id: Option<i64>,
    pub material_name: String,
    pub grade: MaterialGrade,
    pub description: Option<String>,
    /// Explicit penalty override; defaults from the client tariff for BAD
    /// grades with a campaign reference.
    pub penalty_amount: Option<i64>,
    /// Defaults to "grade is BAD".
    pub penalty_applied: Option<bool>,
    pub photo_url: Option<String>,
}

/// Records a material condition.
///
/// References are validated when present. The penalty amount defaults
/// from the commissioning client's tariff for BAD grades recorded against
/// a campaign; an explicit override always wins.
///
/// # Errors
///
/// Returns `CampaignNotFound`/`ProviderNotFound` for dangling references,
/// or a database error.
pub fn record_condition(
    conn: &mut SqliteConnection,
    new: &NewMaterialCondition,
    now: OffsetDateTime,
) -> Result<MaterialCondition, PersistenceError> {
    let campaign: Option<Campaign> = new
        .campaign_id
        .map(|id| queries::campaigns::get_campaign(conn, id))
        .transpose()?;
    if let Some(provider_id) = new.provider_id {
        queries::providers::get_provider(conn, provider_id)?;
    }

    let penalty_amount: i64 = match new.penalty_amount {
        Some(amount) => amount,
        None if new.grade == MaterialGrade::Bad => match &campaign {
            Some(c) => {
                let client_type: ClientType =
                    queries::campaigns::client_type_for_campaign(conn, c)?;
                default_penalty(client_type)
            }
            None => 0,
        },
        None => 0,
    };
    let penalty_applied: bool = new
        .penalty_applied
        .unwrap_or(new.grade == MaterialGrade::Bad);

    diesel::insert_into(material_conditions::table)
        .values((
            material_conditions::campaign_id.eq(new.campaign_id),
            material_conditions::provider_id.eq(new.provider_id),
            material_conditions::material_name.eq(&new.material_name),
            material_conditions::grade.eq(new.grade.as_str()),
            material_conditions::description.eq(new.description.as_deref()),
            material_conditions::penalty_amount.eq(penalty_amount),
            material_conditions::penalty_applied.eq(i32::from(penalty_applied)),
            material_conditions::photo_url.eq(new.photo_url.as_deref()),
            material_conditions::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    let condition_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        condition_id,
        grade = new.grade.as_str(),
        penalty_amount,
        penalty_applied,
        "Material condition recorded"
    );
    queries::conditions::get_condition(conn, condition_id)
}

/// Overrides a condition's penalty amount and/or applied flag.
///
/// # Errors
///
/// Returns `ConditionNotFound`, or a database error.
pub fn update_condition(
    conn: &mut SqliteConnection,
    condition_id: i64,
    penalty_amount: Option<i64>,
    penalty_applied: Option<bool>,
) -> Result<MaterialCondition, PersistenceError> {
    let current: MaterialCondition = queries::conditions::get_condition(conn, condition_id)?;

    diesel::update(material_conditions::table)
        .filter(material_conditions::condition_id.eq(condition_id))
        .set((
            material_conditions::penalty_amount
                .eq(penalty_amount.unwrap_or(current.penalty_amount)),
            material_conditions::penalty_applied
                .eq(i32::from(penalty_applied.unwrap_or(current.penalty_applied))),
        ))
        .execute(conn)?;

    info!(condition_id, "Material condition updated");
    queries::conditions::get_condition(conn, condition_id)
}

/// Deletes a condition, returning the removed record so the caller knows
/// which pair to re-reconcile.
///
/// # Errors
///
/// Returns `ConditionNotFound`, or a database error.
pub fn delete_condition(
    conn: &mut SqliteConnection,
    condition_id: i64,
) -> Result<MaterialCondition, PersistenceError> {
    let condition: MaterialCondition = queries::conditions::get_condition(conn, condition_id)?;
    diesel::delete(material_conditions::table)
        .filter(material_conditions::condition_id.eq(condition_id))
        .execute(conn)?;
    info!(condition_id, "Material condition deleted");
    Ok(condition)
}
