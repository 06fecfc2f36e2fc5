//! # Verification Feature
//!
//! Shared-password gate with best-effort scrubbing of password attempts.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod gate;

pub use gate::{GateDecision, VerificationGate};
