// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Verification results and their reports.

mod report;
mod result;

pub use report::Report;
pub use result::{
    BatchVerificationResult, CategoryOutcome, CommitVerification, RefUpdateVerificationResult,
};
