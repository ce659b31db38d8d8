//! Core funnel and reporting logic for Shepherd.
//!
//! This crate contains pure domain logic with no web or database dependencies.
//!
//! # Modules
//!
//! - `funnel` - Form ids, funnel actions and state derivation
//! - `listing` - List view tabs and page sizes
//! - `organisation` - Identity context and organisation fallback policy
//! - `reporting` - Rates, ratios, time series and report shapes
//! - `settings` - Typed settings over the config table

pub mod funnel;
pub mod listing;
pub mod organisation;
pub mod reporting;
pub mod settings;
