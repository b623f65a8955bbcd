use std::sync::Arc;

use crate::config;
use crate::core::client::client_provider::ClientProvider;
use crate::core::client::kube_client::KubeconfigClientFactory;
use crate::domain::pod::pod_filter_service::PodFilterService;

/// One connection provider and the services built on it, per application
#[derive(Clone)]
pub struct AppState {
    pub client_provider: Arc<ClientProvider<KubeconfigClientFactory>>,
    pub pod_service: PodFilterService<KubeconfigClientFactory>,
}

/// Wire the application context from the process environment.
///
/// Nothing is read from the kubeconfig yet; the connection is built on the
/// first pod lookup.
pub fn build_app_state() -> AppState {
    config::load_dotenv();

    let client_provider = Arc::new(ClientProvider::from_env());
    AppState {
        pod_service: PodFilterService::new(client_provider.clone()),
        client_provider,
    }
}
