//! Discovery of running pods in a Kubernetes namespace.
//!
//! A [`ClientProvider`](core::client::client_provider::ClientProvider) lazily
//! builds one shared connection per application context, and
//! [`PodFilterService`](domain::pod::pod_filter_service::PodFilterService)
//! lists a namespace once and filters the result locally by name pattern,
//! labels and phase.

pub mod app_state;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod logging;

pub use app_state::{build_app_state, AppState};
pub use config::DEFAULT_NAMESPACE;
pub use domain::pod::selection_criteria::SelectionCriteria;
pub use errors::{ClientInitError, PodDiscoveryError};
