// =============================================================================
// Signals Module
// =============================================================================
//
// Composite verdicts layered on top of the individual detectors:
// - Breakout checklist (all price setups aligned plus a volume surge)

pub mod checklist;

pub use checklist::{evaluate_checklist, ChecklistOutcome, PrecomputedOutcomes};
