//! # API Shared
//!
//! Shared definitions for the Clarion APIs.
//!
//! Contains:
//! - Wire DTOs for the analysis request/response contract (`dto` module)
//! - Shared services like `HealthService`
//! - API key checking
//!
//! DTOs carry plain strings and numbers only; translation to and from `clarion-core` domain
//! types happens in `api-rest`.

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::{AnalyseReq, AnalyseRes, AnalysisReportDto, HealthRes, UserPreferencesDto};
pub use health::HealthService;
