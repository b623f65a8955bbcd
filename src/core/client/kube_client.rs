use anyhow::{Context, Result};
use async_trait::async_trait;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::sync::Arc;
use tracing::debug;

use crate::config::KubeconfigSource;

/// Builds the connection handle shared by a [`ClientProvider`].
///
/// [`ClientProvider`]: crate::core::client::client_provider::ClientProvider
#[async_trait]
pub trait ClientFactory: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    async fn build(&self, source: &KubeconfigSource) -> Result<Self::Handle>;
}

/// Low-level connection config plus the API client built from it
#[derive(Clone)]
pub struct KubeConnection {
    pub config: Config,
    pub client: Client,
}

impl std::fmt::Debug for KubeConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeConnection")
            .field("cluster_url", &self.config.cluster_url)
            .field("default_namespace", &self.config.default_namespace)
            .finish()
    }
}

/// Reads a kubeconfig file and connects with its current context
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeconfigClientFactory;

#[async_trait]
impl ClientFactory for KubeconfigClientFactory {
    type Handle = Arc<KubeConnection>;

    async fn build(&self, source: &KubeconfigSource) -> Result<Self::Handle> {
        let path = source.path()?;
        debug!("Reading kubeconfig from {}", path.display());

        let kubeconfig = Kubeconfig::read_from(path)
            .with_context(|| format!("failed to read kubeconfig {}", path.display()))?;

        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .context("failed to build connection config from kubeconfig")?;

        let client = Client::try_from(config.clone()).context("failed to build kube client")?;

        debug!("Kubernetes client built for {}", config.cluster_url);
        Ok(Arc::new(KubeConnection { config, client }))
    }
}
