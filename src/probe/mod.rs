// src/probe/mod.rs
// =============================================================================
// This module contains the link availability prober.
//
// Submodules:
// - check: the two-tier (HEAD, then GET) check of a single link
// - batch: runs checks in bounded concurrent batches and builds the summary
//
// The prober can't fail as a whole. Broken and timed-out links are data in
// the ProbeSummary, not errors.
// =============================================================================

mod batch;
mod check;

pub use batch::{batch_count, probe, ProbeSummary};
pub use check::{check_link, ProbeOutcome, ProbeResult};
