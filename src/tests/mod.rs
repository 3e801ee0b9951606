// fastvar test infrastructure
//
// Small helpers keep their unit tests inline. The suites here drive the whole
// create-variable command through a scripted host against realistic
// component files.

// ============================================================================
// SHARED HELPERS - scripted host and command runner
// ============================================================================
pub mod helpers;

pub mod jsx_tests;
pub mod style_tests;

// ============================================================================
// SESSION TESTS - prompts, cancellation, silent aborts
// ============================================================================
pub mod session_tests;
