// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversions into domain entities.
//!
//! The database stores enums as their wire strings, dates as `YYYY-MM-DD`
//! text, timestamps as RFC 3339 text, and booleans as 0/1 integers. The
//! `TryFrom` impls are the single place those representations are decoded.

use crate::error::PersistenceError;
use camptrack_domain::{
    Assignment, AssignmentStatus, Campaign, CampaignKind, CampaignStatus, ClientType,
    MaterialCondition, MaterialGrade, Payment, PaymentStatus, PaymentType, Provider, VehicleInfo,
    parse_date, parse_timestamp,
};
use diesel::prelude::*;
use std::str::FromStr;
use time::OffsetDateTime;

/// A client row; only the tariff-driving type matters to the rules.
#[derive(Debug, Clone, Queryable)]
pub struct ClientRow {
    pub client_id: i64,
    pub name: String,
    pub client_type: String,
}

impl ClientRow {
    /// Decodes the stored client type.
    ///
    /// # Errors
    ///
    /// Returns an error for an unrecognized stored value.
    pub fn client_type(&self) -> Result<ClientType, PersistenceError> {
        Ok(ClientType::from_str(&self.client_type)?)
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct CampaignRow {
    pub campaign_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub client_id: i64,
    pub location_id: i64,
    pub service_id: i64,
    pub manager: String,
    pub supervisor: Option<String>,
    pub target_quantity: i64,
    pub target_provider_count: Option<i64>,
    pub kind: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub parent_campaign_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = PersistenceError;

    fn try_from(row: CampaignRow) -> Result<Self, Self::Error> {
        Ok(Self {
            campaign_id: row.campaign_id,
            name: row.name,
            description: row.description,
            objective: row.objective,
            client_id: row.client_id,
            location_id: row.location_id,
            service_id: row.service_id,
            manager: row.manager,
            supervisor: row.supervisor,
            target_quantity: row.target_quantity,
            target_provider_count: row.target_provider_count,
            kind: CampaignKind::from_str(&row.kind)?,
            start_date: parse_date(&row.start_date)?,
            end_date: parse_date(&row.end_date)?,
            status: CampaignStatus::from_str(&row.status)?,
            parent_campaign_id: row.parent_campaign_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct ProviderRow {
    pub provider_id: i64,
    pub name: String,
    pub contact: String,
    pub service_id: i64,
    pub available: i32,
    pub panel_type: Option<String>,
    pub plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub verification_code: Option<String>,
    pub contract_valid: i32,
    pub gps_equipped: i32,
}

impl From<ProviderRow> for Provider {
    fn from(row: ProviderRow) -> Self {
        Self {
            provider_id: row.provider_id,
            name: row.name,
            contact: row.contact,
            service_id: row.service_id,
            available: row.available != 0,
            vehicle: VehicleInfo {
                panel_type: row.panel_type,
                plate: row.plate,
                brand: row.brand,
                model: row.model,
                color: row.color,
            },
            verification_code: row.verification_code,
            contract_valid: row.contract_valid != 0,
            gps_equipped: row.gps_equipped != 0,
        }
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub campaign_id: i64,
    pub provider_id: i64,
    pub status: String,
    pub created_at: String,
    pub end_date: Option<String>,
    pub deinstalled_at: Option<String>,
    pub poster_image: Option<String>,
}

fn parse_optional_timestamp(
    value: Option<String>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(|s| parse_timestamp(&s)).transpose().map_err(Into::into)
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = PersistenceError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            campaign_id: row.campaign_id,
            provider_id: row.provider_id,
            status: AssignmentStatus::from_str(&row.status)?,
            created_at: row.created_at,
            end_date: parse_optional_timestamp(row.end_date)?,
            deinstalled_at: parse_optional_timestamp(row.deinstalled_at)?,
            poster_image: row.poster_image,
        })
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct MaterialConditionRow {
    pub condition_id: i64,
    pub campaign_id: Option<i64>,
    pub provider_id: Option<i64>,
    pub material_name: String,
    pub grade: String,
    pub description: Option<String>,
    pub penalty_amount: i64,
    pub penalty_applied: i32,
    pub photo_url: Option<String>,
    pub created_at: String,
}

impl TryFrom<MaterialConditionRow> for MaterialCondition {
    type Error = PersistenceError;

    fn try_from(row: MaterialConditionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            condition_id: row.condition_id,
            campaign_id: row.campaign_id,
            provider_id: row.provider_id,
            material_name: row.material_name,
            grade: MaterialGrade::from_str(&row.grade)?,
            description: row.description,
            penalty_amount: row.penalty_amount,
            penalty_applied: row.penalty_applied != 0,
            photo_url: row.photo_url,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct PaymentRow {
    pub payment_id: i64,
    pub campaign_id: i64,
    pub provider_id: i64,
    pub payment_type: String,
    pub base_amount: i64,
    pub sanction_amount: i64,
    pub final_amount: i64,
    pub status: String,
    pub is_paid: i32,
    pub paid_at: Option<String>,
    pub created_at: String,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = PersistenceError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            payment_id: row.payment_id,
            campaign_id: row.campaign_id,
            provider_id: row.provider_id,
            payment_type: PaymentType::from_str(&row.payment_type)?,
            base_amount: row.base_amount,
            sanction_amount: row.sanction_amount,
            final_amount: row.final_amount,
            status: PaymentStatus::from_str(&row.status)?,
            is_paid: row.is_paid != 0,
            paid_at: row.paid_at,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct PaymentTransactionRow {
    pub transaction_id: i64,
    pub payment_id: i64,
    pub amount: i64,
    pub method: String,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub recorded_by: String,
    pub created_at: String,
}

impl From<PaymentTransactionRow> for camptrack_domain::PaymentTransaction {
    fn from(row: PaymentTransactionRow) -> Self {
        Self {
            transaction_id: row.transaction_id,
            payment_id: row.payment_id,
            amount: row.amount,
            method: row.method,
            reference: row.reference,
            note: row.note,
            recorded_by: row.recorded_by,
            created_at: row.created_at,
        }
    }
}

/// A registered campaign document.
#[derive(Debug, Clone, Queryable)]
pub struct CampaignFileRow {
    pub file_id: i64,
    pub campaign_id: i64,
    pub label: String,
    pub url: String,
    pub created_at: String,
}
