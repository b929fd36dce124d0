//! Data exchanged with the computation service
//!
//! `result` describes what the service returns; `design` describes the
//! parameters sent to it.

pub mod design;
pub mod result;

pub use design::{DesignFile, DesignTendonConfig, DisplayUnits, PccRequest};
pub use result::{
    load_result, ActuationCommand, ApiEnvelope, ComputationResult, CouplingData, ModelError,
    PullDirection, TendonAnalysis, TendonConfig, TendonLengths, TendonPath,
};
