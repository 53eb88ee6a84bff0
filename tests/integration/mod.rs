//! Integration test modules.

mod config_test;
mod replay_test;
