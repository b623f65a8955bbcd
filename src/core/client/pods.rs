use anyhow::Result;
use async_trait::async_trait;
use kube::api::ListParams;
use kube::{Api, Client};
use std::sync::Arc;
use tracing::debug;

use crate::core::client::kube_client::KubeConnection;
use crate::core::client::kube_resources::Pod;

/// "List pods in namespace" against the cluster API.
///
/// Implementations must not apply any label or field selector: the caller
/// filters the full list itself.
#[async_trait]
pub trait PodLister: Send + Sync {
    async fn list_namespaced_pods(&self, namespace: &str) -> Result<Vec<Pod>>;
}

/// Fetch pods in a specific namespace
pub async fn fetch_pods_by_namespace(client: &Client, namespace: &str) -> Result<Vec<Pod>> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let pod_list = pods.list(&ListParams::default()).await?;

    debug!("Discovered {} pod(s) in namespace '{}'", pod_list.items.len(), namespace);
    Ok(pod_list.items)
}

#[async_trait]
impl PodLister for Client {
    async fn list_namespaced_pods(&self, namespace: &str) -> Result<Vec<Pod>> {
        fetch_pods_by_namespace(self, namespace).await
    }
}

#[async_trait]
impl PodLister for KubeConnection {
    async fn list_namespaced_pods(&self, namespace: &str) -> Result<Vec<Pod>> {
        fetch_pods_by_namespace(&self.client, namespace).await
    }
}

#[async_trait]
impl<T: PodLister + ?Sized> PodLister for Arc<T> {
    async fn list_namespaced_pods(&self, namespace: &str) -> Result<Vec<Pod>> {
        (**self).list_namespaced_pods(namespace).await
    }
}
