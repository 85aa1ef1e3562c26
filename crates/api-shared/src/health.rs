use crate::wire::HealthRes;

/// Simple health service shared by the HTML and JSON surfaces.
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Diabetes survey is alive".into(),
        }
    }
}
