#[path = "../common/mod.rs"]
mod common;

mod config_loading;
mod error_handling;
mod fs_abstraction;
mod git_provider;
