//! Core business logic for the society ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `period` - Calendar months
//! - `dues` - Monthly dues planning and unit references
//! - `allocation` - Pending maintenance split across months
//! - `penalty` - Penalty transitions and totals
//! - `balance` - Final balance formula
//! - `dashboard` - Dashboard summary and its cache
//! - `poll` - Poll validation and vote counting
//! - `ledger` - Income and expense entries
//! - `notice` - Notice validation
//! - `payment` - Gateway signature verification
//! - `auth` - Password hashing and society roles

pub mod allocation;
pub mod auth;
pub mod balance;
pub mod dashboard;
pub mod dues;
pub mod ledger;
pub mod lifecycle;
pub mod notice;
pub mod payment;
pub mod penalty;
pub mod period;
pub mod poll;
