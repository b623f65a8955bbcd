use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, OnceLock};
use tracing::{error, info};

use crate::config::KubeconfigSource;
use crate::core::client::kube_client::{ClientFactory, KubeconfigClientFactory};
use crate::errors::ClientInitError;

type SharedBuild<H> = Shared<BoxFuture<'static, Result<H, ClientInitError>>>;

/// Lazily builds one connection handle and shares it with every caller.
///
/// The factory runs at most once per provider, on a task of its own, so a
/// caller that gives up (timeout, dropped future) does not abort the build.
/// Concurrent first callers wait for that single run and all observe its
/// outcome. A failed build is kept as well, so later calls get the same
/// [`ClientInitError`] without retrying.
pub struct ClientProvider<F: ClientFactory> {
    factory: Arc<F>,
    source: KubeconfigSource,
    build: OnceLock<SharedBuild<F::Handle>>,
}

impl<F: ClientFactory> ClientProvider<F> {
    pub fn new(factory: F, source: KubeconfigSource) -> Self {
        Self {
            factory: Arc::new(factory),
            source,
            build: OnceLock::new(),
        }
    }

    /// Return the shared handle, building it on first use.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn handle(&self) -> Result<F::Handle, ClientInitError> {
        self.build.get_or_init(|| self.spawn_build()).clone().await
    }

    /// Whether the first build has finished, successfully or not.
    pub fn is_initialized(&self) -> bool {
        self.build
            .get()
            .is_some_and(|build| build.peek().is_some())
    }

    fn spawn_build(&self) -> SharedBuild<F::Handle> {
        let factory = self.factory.clone();
        let source = self.source.clone();

        let task = tokio::spawn(async move {
            match factory.build(&source).await {
                Ok(handle) => {
                    info!("Kubernetes client initialized successfully");
                    Ok(handle)
                }
                Err(e) => {
                    let err = ClientInitError::from(e);
                    error!("{}", err);
                    Err(err)
                }
            }
        });

        async move {
            task.await.unwrap_or_else(|e| {
                Err(ClientInitError::new(format!(
                    "client initialization task failed: {e}"
                )))
            })
        }
        .boxed()
        .shared()
    }
}

impl ClientProvider<KubeconfigClientFactory> {
    /// Provider reading `KUBECONFIG`, falling back to `$HOME/.kube/config`.
    pub fn from_env() -> Self {
        Self::new(KubeconfigClientFactory, KubeconfigSource::from_env())
    }
}
