// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries. Free functions over a connection so mutations can
//! reuse them inside their own transactions.

pub mod assignments;
pub mod campaigns;
pub mod conditions;
pub mod payments;
pub mod providers;
pub mod reports;
