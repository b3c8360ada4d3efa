//! Credit approval engine: customer registration, credit scoring, loan
//! eligibility decisions, and bulk ingestion of historical workbook data.
//!
//! The decision core ([`lending::emi`], [`lending::scoring`],
//! [`lending::eligibility`]) is made of pure functions over caller-supplied
//! snapshots; storage and the HTTP surface sit behind the repository traits
//! and router in [`lending`].

pub mod config;
pub mod error;
pub mod lending;
pub mod telemetry;
