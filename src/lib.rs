//! Traffic Control Center - railway operations dashboard
//!
//! Polls a metrics/timeline feed, keeps a bounded alert log and renders KPIs
//! and a block-occupancy chart into an in-memory view surface. Ships with a
//! demo simulator that serves the same feed.

pub mod alerts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod logging;
pub mod refresh;
pub mod sim;
pub mod timeline;
pub mod view;
