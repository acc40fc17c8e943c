// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod tariffs;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use tariffs::{
    DEINSTALLATION_FEE, applied_sanction_total, base_payment, default_penalty, final_amount,
};
pub use types::{
    Assignment, AssignmentStatus, Campaign, CampaignKind, CampaignStatus, ClientType,
    MaterialCondition, MaterialGrade, Payment, PaymentStatus, PaymentTransaction, PaymentType,
    Provider, VehicleInfo,
};
pub use validation::{
    format_date, format_timestamp, parse_date, parse_timestamp, ranges_overlap,
    validate_date_range,
};
