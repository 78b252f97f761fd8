use k8s_openapi::api::core::v1::{Container, Pod};
use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use serde::Deserialize;

use crate::errors::ExtractError;

/// Deserialize the object embedded into an AdmissionRequest into a Pod.
pub fn extract(object: Option<&RawExtension>) -> Result<Pod, ExtractError> {
    let raw = object.ok_or_else(|| {
        ExtractError::SchemaMismatch("admission request does not carry an object".to_string())
    })?;

    Pod::deserialize(&raw.0).map_err(|e| ExtractError::SchemaMismatch(e.to_string()))
}

/// The containers the Pod currently declares, in their original order.
pub fn containers(pod: &Pod) -> &[Container] {
    pod.spec
        .as_ref()
        .map(|spec| spec.containers.as_slice())
        .unwrap_or(&[])
}
