//! Core business logic for Aperture.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, state machines, and calculations live here.
//!
//! # Modules
//!
//! - `pricing` - Line item totals, discounts, grand totals
//! - `numbering` - Document number formatting (`QT_AKP_26_0001`)
//! - `quotation` - Quotation lifecycle state machine and order snapshots
//! - `order` - Production workflow tracking and financial rollups
//! - `dashboard` - Report windows and summary aggregation
//! - `documents` - Printable quotation/invoice rendering

pub mod dashboard;
pub mod documents;
pub mod numbering;
pub mod order;
pub mod pricing;
pub mod quotation;
