// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutations for the reference entities the business rules read: clients,
//! services, locations, and providers. Their administrative surfaces stay
//! minimal; campaigns and settlements carry the real logic.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::diesel_schema::{clients, locations, providers, services};
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;
use camptrack_domain::{ClientType, VehicleInfo};

/// Creates a client.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_client(
    conn: &mut SqliteConnection,
    name: &str,
    client_type: ClientType,
) -> Result<i64, PersistenceError> {
    info!("Creating client: {name} ({})", client_type.as_str());
    diesel::insert_into(clients::table)
        .values((
            clients::name.eq(name),
            clients::client_type.eq(client_type.as_str()),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Creates a service category.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_service(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    info!("Creating service: {name}");
    diesel::insert_into(services::table)
        .values(services::name.eq(name))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Creates a location.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_location(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    info!("Creating location: {name}");
    diesel::insert_into(locations::table)
        .values(locations::name.eq(name))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Creates a provider. New providers start available.
///
/// The plate's unique index backs the one-plate-one-provider rule.
///
/// # Errors
///
/// Returns an error if the insert fails, including a duplicate plate.
pub fn create_provider(
    conn: &mut SqliteConnection,
    name: &str,
    contact: &str,
    service_id: i64,
    vehicle: &VehicleInfo,
    verification_code: Option<&str>,
    contract_valid: bool,
    gps_equipped: bool,
) -> Result<i64, PersistenceError> {
    info!("Creating provider: {name} (service {service_id})");
    diesel::insert_into(providers::table)
        .values((
            providers::name.eq(name),
            providers::contact.eq(contact),
            providers::service_id.eq(service_id),
            providers::available.eq(1),
            providers::panel_type.eq(vehicle.panel_type.as_deref()),
            providers::plate.eq(vehicle.plate.as_deref()),
            providers::brand.eq(vehicle.brand.as_deref()),
            providers::model.eq(vehicle.model.as_deref()),
            providers::color.eq(vehicle.color.as_deref()),
            providers::verification_code.eq(verification_code),
            providers::contract_valid.eq(i32::from(contract_valid)),
            providers::gps_equipped.eq(i32::from(gps_equipped)),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
