//! End-to-end flow tests for the staff directory identity subsystem live
//! under `tests/`; this crate intentionally exports nothing.
