// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for the Thousand table (config, prefs,
//! toasts, authority event log). Keeps the driver binary thin.

pub mod config;
pub mod config_port;
pub mod event_log;
pub mod prefs;
pub mod toast;
