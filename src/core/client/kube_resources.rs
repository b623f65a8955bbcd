/// Re-export the k8s-openapi types the discovery core reads
pub use k8s_openapi::api::core::v1::{Pod, PodStatus};

pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// `status.phase` value of a pod whose containers have started
pub const POD_PHASE_RUNNING: &str = "Running";
