//! Shared models for macseek: the discovered-device [`Entry`](network::entry::Entry),
//! interface helpers, target enumeration, vendor abstractions and configuration.

pub mod config;
pub mod network;
pub mod vendors;
