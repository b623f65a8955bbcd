use std::env;
use std::path::{Path, PathBuf};

use crate::errors::ClientInitError;

/// Namespace used by embedding tools when the user does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Environment variable overriding the kubeconfig location.
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Load a `.env` file from the working directory if one exists.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
}

/// Pick the kubeconfig path: an explicit override wins, otherwise
/// `<home>/.kube/config`. Empty values count as unset.
pub fn resolve_kubeconfig_path(
    kubeconfig: Option<String>,
    home: Option<PathBuf>,
) -> Result<PathBuf, ClientInitError> {
    if let Some(path) = kubeconfig.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    home.filter(|h| !h.as_os_str().is_empty())
        .map(|h| h.join(".kube").join("config"))
        .ok_or_else(|| {
            ClientInitError::new(format!(
                "neither {} nor HOME is set, cannot locate kubeconfig",
                KUBECONFIG_ENV
            ))
        })
}

/// Where the connection configuration is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KubeconfigSource {
    Path(PathBuf),
    /// Resolution already failed; surfaced when the client is first built.
    Unresolved(ClientInitError),
}

impl KubeconfigSource {
    pub fn from_env() -> Self {
        let kubeconfig = env::var(KUBECONFIG_ENV).ok();
        let home = env::var_os("HOME").map(PathBuf::from);

        match resolve_kubeconfig_path(kubeconfig, home) {
            Ok(path) => KubeconfigSource::Path(path),
            Err(e) => KubeconfigSource::Unresolved(e),
        }
    }

    pub fn path(&self) -> Result<&Path, ClientInitError> {
        match self {
            KubeconfigSource::Path(p) => Ok(p.as_path()),
            KubeconfigSource::Unresolved(e) => Err(e.clone()),
        }
    }
}

impl From<PathBuf> for KubeconfigSource {
    fn from(path: PathBuf) -> Self {
        KubeconfigSource::Path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_path_wins_over_home() {
        let path = resolve_kubeconfig_path(
            Some("/etc/kube/admin.conf".to_string()),
            Some(PathBuf::from("/home/ops")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/etc/kube/admin.conf"));
    }

    #[test]
    fn falls_back_to_home_kube_config() {
        let path = resolve_kubeconfig_path(None, Some(PathBuf::from("/home/ops"))).unwrap();
        assert_eq!(path, PathBuf::from("/home/ops/.kube/config"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let path =
            resolve_kubeconfig_path(Some(String::new()), Some(PathBuf::from("/root"))).unwrap();
        assert_eq!(path, PathBuf::from("/root/.kube/config"));
    }

    #[test]
    fn missing_everything_is_an_init_error() {
        let err = resolve_kubeconfig_path(None, None).unwrap_err();
        assert!(err.message().contains("KUBECONFIG"));
    }

    #[test]
    fn unresolved_source_reports_its_error() {
        let source = KubeconfigSource::Unresolved(ClientInitError::new("no home"));
        assert_eq!(source.path().unwrap_err().message(), "no home");
    }
}
