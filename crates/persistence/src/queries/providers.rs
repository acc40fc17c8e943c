// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Provider queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::ProviderRow;
use crate::diesel_schema::providers;
use crate::error::PersistenceError;
use camptrack_domain::Provider;

/// Loads one provider.
///
/// # Errors
///
/// Returns `ProviderNotFound` if no row exists.
pub fn get_provider(
    conn: &mut SqliteConnection,
    provider_id: i64,
) -> Result<Provider, PersistenceError> {
    let row: ProviderRow = providers::table
        .filter(providers::provider_id.eq(provider_id))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::ProviderNotFound(provider_id))?;
    Ok(row.into())
}

/// Loads every provider.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_providers(conn: &mut SqliteConnection) -> Result<Vec<Provider>, PersistenceError> {
    let rows: Vec<ProviderRow> = providers::table
        .order(providers::provider_id.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(Into::into).collect())
}
