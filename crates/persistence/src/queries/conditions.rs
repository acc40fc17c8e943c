// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Material-condition queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::MaterialConditionRow;
use crate::diesel_schema::material_conditions;
use crate::error::PersistenceError;
use camptrack_domain::MaterialCondition;

/// Loads one material condition.
///
/// # Errors
///
/// Returns `ConditionNotFound` if no row exists.
pub fn get_condition(
    conn: &mut SqliteConnection,
    condition_id: i64,
) -> Result<MaterialCondition, PersistenceError> {
    let row: MaterialConditionRow = material_conditions::table
        .filter(material_conditions::condition_id.eq(condition_id))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::ConditionNotFound(condition_id))?;
    row.try_into()
}

/// Lists the conditions recorded against a (campaign, provider) pair.
/// These are the rows the reconciler sums over.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_for_pair(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
) -> Result<Vec<MaterialCondition>, PersistenceError> {
    let rows: Vec<MaterialConditionRow> = material_conditions::table
        .filter(material_conditions::campaign_id.eq(campaign_id))
        .filter(material_conditions::provider_id.eq(provider_id))
        .order(material_conditions::condition_id.asc())
        .load(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}
