// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations. Free functions over a connection; the `Persistence`
//! adapter wraps each logical operation in one transaction and invokes
//! the core rules on rows read inside that transaction.

pub mod assignments;
pub mod campaigns;
pub mod conditions;
pub mod payments;
pub mod reference;
pub mod renewal;
pub mod sweeps;
pub mod uninstall;

pub use renewal::RenewalOutcome;
pub use sweeps::{ReleaseSweep, TerminationSweep};
pub use uninstall::UninstallationOutcome;
