//! `axplug_core` -- Pure Rust core for the axplug UI-automation plugin.
//!
//! This crate contains all plugin logic with **no FFI types**.  It is
//! consumed by:
//! - `axplug-ffi` (C ABI cdylib exporting the plugin function table)
//! - `axplug-cli` (line-delimited JSON harness for in-process driving)
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `PluginError` enum via `thiserror` |
//! | [`codec`] | Total JSON encoding of results and error documents |
//! | [`flags`] | Modifier-name to event-flag bitmask translation |
//! | [`engine`] | `AutomationEngine` trait and action/option types |
//! | [`bridge`] | Engine worker thread and blocking call bridge |
//! | [`tools`] | Tool handlers and the fixed tool registry |
//! | [`manifest`] | Capability manifest document |
//! | [`context`] | `PluginContext` -- one loaded-plugin instance |

pub mod bridge;
pub mod codec;
pub mod context;
pub mod engine;
pub mod errors;
pub mod flags;
pub mod manifest;
pub mod tools;
