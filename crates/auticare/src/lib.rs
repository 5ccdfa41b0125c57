//! Screening score fusion and the ML video prediction proxy behind the AutiCare service.

pub mod assessment;
pub mod config;
pub mod error;
pub mod prediction;
pub mod scoring;
pub mod telemetry;
