//! Time-series utilities shared by fetchers and the orchestrator.
//!
//! Modules include:
//! - `fieldmap`: per-asset-class column layout and session timezone
//! - `normalize`: turn a provider payload into a canonical `Series`
//! - `resample`: aggregate a series into a coarser timeframe
/// Column layout per asset class.
pub mod fieldmap;
/// Payload validation and canonicalization.
pub mod normalize;
/// Resampling utilities for aggregating candles to coarser timeframes.
pub mod resample;
