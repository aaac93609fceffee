//! Credentialing compliance engine.
//!
//! Evaluates extracted document text against a catalog of hard (mandatory) and soft
//! (preferred) credentialing rules and produces a scored compliance report.

pub mod api;
pub mod config;
pub mod credentialing;
pub mod error;
pub mod telemetry;
