use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::client::client_provider::ClientProvider;
use crate::core::client::kube_client::ClientFactory;
use crate::core::client::kube_resources::Pod;
use crate::core::client::pods::PodLister;
use crate::domain::pod::pod_filter::{compile_name_pattern, filter_pods};
use crate::domain::pod::selection_criteria::SelectionCriteria;
use crate::errors::PodDiscoveryError;

/// Resolves the running pods of a namespace that match a name pattern and
/// a set of labels.
pub struct PodFilterService<F: ClientFactory> {
    provider: Arc<ClientProvider<F>>,
}

impl<F: ClientFactory> Clone for PodFilterService<F> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

impl<F> PodFilterService<F>
where
    F: ClientFactory,
    F::Handle: PodLister,
{
    pub fn new(provider: Arc<ClientProvider<F>>) -> Self {
        Self { provider }
    }

    /// List every pod in `namespace` once, then keep the ones whose name
    /// matches `name_pattern` (unanchored) and which are Running with all of
    /// `required_labels`. Pods without labels are never returned, and a
    /// `None` label requirement returns no pods; use an empty map to accept
    /// any labelled Running pod.
    pub async fn list_pods(
        &self,
        namespace: &str,
        name_pattern: Option<&str>,
        required_labels: Option<&BTreeMap<String, String>>,
    ) -> Result<Vec<Pod>, PodDiscoveryError> {
        let handle = self.provider.handle().await?;

        let pods = handle
            .list_namespaced_pods(namespace)
            .await
            .map_err(|source| PodDiscoveryError::ListFailed {
                namespace: namespace.to_string(),
                source,
            })?;

        let pattern = compile_name_pattern(name_pattern).map_err(|e| {
            warn!("Rejected pod name pattern {:?}: {}", name_pattern, e);
            e
        })?;

        let total = pods.len();
        let matched = filter_pods(pods, pattern.as_ref(), required_labels);

        debug!(
            "Matched {} of {} pod(s) in namespace '{}'",
            matched.len(),
            total,
            namespace
        );
        Ok(matched)
    }

    /// Criteria-based [`list_pods`](Self::list_pods). Criteria without any
    /// label set (`labels == None`) match no pods.
    pub async fn discover(
        &self,
        criteria: &SelectionCriteria,
    ) -> Result<Vec<Pod>, PodDiscoveryError> {
        self.list_pods(
            &criteria.namespace,
            criteria.name_pattern.as_deref(),
            criteria.labels.as_ref(),
        )
        .await
    }

    /// Names of the matching pods, in list order
    pub async fn discover_names(
        &self,
        criteria: &SelectionCriteria,
    ) -> Result<Vec<String>, PodDiscoveryError> {
        let pods = self.discover(criteria).await?;
        let names = pods
            .into_iter()
            .filter_map(|p| p.metadata.name)
            .collect();

        Ok(names)
    }

    pub fn provider(&self) -> &Arc<ClientProvider<F>> {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KubeconfigSource;
    use crate::domain::pod::pod_filter::tests::{labels, pod};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockCluster {
        pods: Vec<Pod>,
        unreachable: bool,
        list_calls: AtomicUsize,
        namespaces_seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PodLister for MockCluster {
        async fn list_namespaced_pods(&self, namespace: &str) -> Result<Vec<Pod>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.namespaces_seen
                .lock()
                .unwrap()
                .push(namespace.to_string());
            if self.unreachable {
                anyhow::bail!("connection refused");
            }
            Ok(self.pods.clone())
        }
    }

    struct MockFactory {
        cluster: Option<Arc<MockCluster>>,
    }

    #[async_trait]
    impl ClientFactory for MockFactory {
        type Handle = Arc<MockCluster>;

        async fn build(&self, _source: &KubeconfigSource) -> Result<Self::Handle> {
            self.cluster
                .clone()
                .ok_or_else(|| anyhow::anyhow!("kubeconfig has no current context"))
        }
    }

    fn service_for(cluster: Option<Arc<MockCluster>>) -> PodFilterService<MockFactory> {
        let provider = ClientProvider::new(
            MockFactory { cluster },
            KubeconfigSource::from(PathBuf::from("/tmp/kubeconfig")),
        );
        PodFilterService::new(Arc::new(provider))
    }

    fn cluster_with(pods: Vec<Pod>) -> Arc<MockCluster> {
        Arc::new(MockCluster {
            pods,
            ..Default::default()
        })
    }

    fn sample_pods() -> Vec<Pod> {
        vec![
            pod("web-1", Some(&[("app", "web")]), Some("Running")),
            pod("web-2", Some(&[]), Some("Running")),
            pod("cache-1", Some(&[("app", "cache")]), Some("Pending")),
        ]
    }

    #[tokio::test]
    async fn selects_running_labelled_pods_by_name_and_labels() {
        let cluster = cluster_with(sample_pods());
        let service = service_for(Some(cluster.clone()));

        let result = service
            .list_pods("default", Some("web"), Some(&labels(&[("app", "web")])))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].metadata.name.as_deref(), Some("web-1"));
        assert_eq!(cluster.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(*cluster.namespaces_seen.lock().unwrap(), vec!["default"]);
    }

    // Quirk: leaving the labels out matches nothing, an empty set matches
    // every labelled Running pod.
    #[tokio::test]
    async fn absent_labels_match_nothing_but_empty_labels_match_all() {
        let cluster = cluster_with(sample_pods());
        let service = service_for(Some(cluster.clone()));

        let absent = service.list_pods("default", None, None).await.unwrap();
        let empty = service
            .list_pods("default", Some(""), Some(&BTreeMap::new()))
            .await
            .unwrap();

        assert!(absent.is_empty());
        // Only web-1 is both labelled and Running.
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].metadata.name.as_deref(), Some("web-1"));
        assert_eq!(cluster.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn discover_respects_unset_and_empty_label_sets() {
        let service = service_for(Some(cluster_with(sample_pods())));

        let unset = SelectionCriteria::new("default");
        let any = SelectionCriteria::new("default").with_any_labels();

        assert!(service.discover(&unset).await.unwrap().is_empty());
        assert_eq!(service.discover_names(&any).await.unwrap(), vec!["web-1"]);
    }

    #[tokio::test]
    async fn invalid_pattern_is_a_local_error() {
        let service = service_for(Some(cluster_with(sample_pods())));

        let err = service
            .list_pods("default", Some("web-[0-9"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, PodDiscoveryError::InvalidNamePattern(_)));
        assert!(!err.is_client_init());
    }

    #[tokio::test]
    async fn list_failure_is_propagated() {
        let cluster = Arc::new(MockCluster {
            pods: sample_pods(),
            unreachable: true,
            ..Default::default()
        });
        let service = service_for(Some(cluster));

        let err = service.list_pods("staging", None, None).await.unwrap_err();

        match err {
            PodDiscoveryError::ListFailed { namespace, source } => {
                assert_eq!(namespace, "staging");
                assert!(source.to_string().contains("connection refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn init_failure_reaches_every_call() {
        let service = service_for(None);

        for _ in 0..3 {
            let err = service.list_pods("default", None, None).await.unwrap_err();
            assert!(err.is_client_init());
            assert!(err.to_string().contains("no current context"));
        }
    }

    #[tokio::test]
    async fn calls_share_one_handle_but_list_each_time() {
        let cluster = cluster_with(sample_pods());
        let service = service_for(Some(cluster.clone()));
        let criteria = SelectionCriteria::new("default").with_label("app", "web");

        service.discover(&criteria).await.unwrap();
        service.clone().discover(&criteria).await.unwrap();

        assert!(service.provider().is_initialized());
        assert_eq!(cluster.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn discover_names_preserves_order() {
        let pods = vec![
            pod("api-2", Some(&[("app", "api"), ("env", "prod")]), Some("Running")),
            pod("api-1", Some(&[("app", "api")]), Some("Running")),
            pod("api-0", Some(&[("app", "api"), ("env", "prod")]), Some("Running")),
            pod("worker-0", Some(&[("app", "api"), ("env", "prod")]), Some("Running")),
        ];
        let service = service_for(Some(cluster_with(pods)));
        let criteria = SelectionCriteria::new("prod")
            .with_name_pattern("api-")
            .with_labels([("app", "api"), ("env", "prod")]);

        let names = service.discover_names(&criteria).await.unwrap();

        assert_eq!(names, vec!["api-2", "api-0"]);
    }

    #[tokio::test]
    async fn empty_namespace_yields_empty_result() {
        let service = service_for(Some(cluster_with(Vec::new())));

        let result = service
            .list_pods("empty", Some("anything"), None)
            .await
            .unwrap();

        assert!(result.is_empty());
    }
}
