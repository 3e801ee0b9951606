// Structural adapter test suites
//
// Small helpers keep their tests inline; these suites exercise the adapter
// end to end against realistic component files.

pub mod classify_tests;
