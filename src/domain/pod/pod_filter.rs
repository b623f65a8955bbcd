//! In-memory matching of pods against selection criteria.
//!
//! Known quirks kept on purpose, since callers observe them:
//! - the name pattern is a regex *search*, so `web` matches `old-web-1`;
//! - a pod with no labels never matches, even when no labels are required;
//! - an absent label requirement matches nothing, while an empty one matches
//!   every labelled Running pod.

use regex::Regex;
use std::collections::BTreeMap;

use crate::core::client::kube_resources::{Pod, POD_PHASE_RUNNING};

/// Compile the name pattern. Absent and empty patterns yield `None`.
pub fn compile_name_pattern(pattern: Option<&str>) -> Result<Option<Regex>, regex::Error> {
    match pattern {
        Some(p) if !p.is_empty() => Regex::new(p).map(Some),
        _ => Ok(None),
    }
}

/// Unanchored search of the pattern in the pod name.
pub fn matches_name(pod: &Pod, pattern: Option<&Regex>) -> bool {
    match pattern {
        Some(re) => re.is_match(pod.metadata.name.as_deref().unwrap_or_default()),
        None => true,
    }
}

/// The pod is Running, has labels, and carries every required label.
pub fn matches_labels_and_phase(pod: &Pod, required: &BTreeMap<String, String>) -> bool {
    let labels = match pod.metadata.labels.as_ref() {
        Some(labels) if !labels.is_empty() => labels,
        _ => return false,
    };

    let running = pod
        .status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        == Some(POD_PHASE_RUNNING);
    if !running {
        return false;
    }

    required
        .iter()
        .all(|(key, value)| labels.get(key) == Some(value))
}

/// Keep the pods passing both checks, in list order.
///
/// `required == None` keeps nothing; pass an empty map to require no labels.
pub fn filter_pods(
    pods: Vec<Pod>,
    pattern: Option<&Regex>,
    required: Option<&BTreeMap<String, String>>,
) -> Vec<Pod> {
    let Some(required) = required else {
        return Vec::new();
    };

    pods.into_iter()
        .filter(|pod| matches_name(pod, pattern) && matches_labels_and_phase(pod, required))
        .collect()
}
