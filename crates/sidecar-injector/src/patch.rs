use k8s_openapi::api::core::v1::{Container, Pod};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::errors::EncodeError;
use crate::target;
use crate::template::MutationTemplate;

/// JSON pointer to the containers of a Pod
pub const CONTAINERS_PATH: &str = "/spec/containers";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PatchOp::Add => write!(f, "add"),
        }
    }
}

/// The shapes a patch value can take. Serialized untagged, so on the wire
/// this is either a container object or an array of containers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Containers(Vec<Container>),
    Container(Box<Container>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: PatchValue,
}

impl PatchOperation {
    pub fn add(path: impl Into<String>, value: PatchValue) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value,
        }
    }
}

/// An ordered list of patch operations. The order is significant: the
/// operations append, so they must be applied as given.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchSet(Vec<PatchOperation>);

impl PatchSet {
    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> Result<Vec<u8>, EncodeError> {
        serde_json::to_vec(&self.0).map_err(EncodeError::Patch)
    }
}

impl FromIterator<PatchOperation> for PatchSet {
    fn from_iter<I: IntoIterator<Item = PatchOperation>>(iter: I) -> Self {
        PatchSet(iter.into_iter().collect())
    }
}

/// Compute the operations appending the template containers to `existing`,
/// the collection found at `base_path`.
///
/// A JSON patch cannot append with `/-` to a collection that is empty (the
/// API server drops empty lists, the path may not exist at all). When
/// `existing` is empty the first operation adds the whole collection instead.
pub fn generate(existing: &[Container], template: &MutationTemplate, base_path: &str) -> PatchSet {
    let mut first = existing.is_empty();

    template
        .containers()
        .iter()
        .map(|container| {
            let operation = if first {
                first = false;
                PatchOperation::add(base_path, PatchValue::Containers(vec![container.clone()]))
            } else {
                PatchOperation::add(
                    format!("{base_path}/-"),
                    PatchValue::Container(Box::new(container.clone())),
                )
            };
            debug!(
                op = %operation.op,
                path = operation.path.as_str(),
                container = container.name.as_str(),
                "container json patch"
            );
            operation
        })
        .collect()
}

/// Build the patch injecting the template containers into the Pod.
pub fn create_patch(pod: &Pod, template: &MutationTemplate) -> PatchSet {
    generate(target::containers(pod), template, CONTAINERS_PATH)
}
