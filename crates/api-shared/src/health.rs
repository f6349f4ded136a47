use crate::dto::HealthRes;

/// Simple health service behind the REST `/health` endpoint.
///
/// This service provides a standardised way to check the health status of Clarion.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Clarion is alive".into(),
        }
    }
}
