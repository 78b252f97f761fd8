use k8s_openapi::api::authentication::v1::UserInfo;
use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{DecodeError, EncodeError};

pub const ADMISSION_API_VERSION: &str = "admission.k8s.io/v1";
pub const ADMISSION_REVIEW_KIND: &str = "AdmissionReview";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRequest {
    pub uid: String,
    pub kind: GroupVersionKind,
    pub resource: GroupVersionResource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub operation: Operation,
    #[serde(default)]
    pub user_info: UserInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<RawExtension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_object: Option<RawExtension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<RawExtension>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupVersionResource {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub resource: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Update,
    Delete,
    Connect,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// This models the admission/v1/AdmissionResponse object of Kubernetes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    /// Copied over from the corresponding AdmissionRequest.
    pub uid: String,

    pub allowed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,

    /// Base64 encoded JSONPatch document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,

    /// Only consulted by the API server when `allowed` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AdmissionResponseStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchType {
    #[serde(rename = "JSONPatch")]
    #[default]
    JSONPatch,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionResponseStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

/// Inbound envelope. Only ever built through [`decode`], which guarantees the
/// request section is there and the schema version is the supported one.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewRequest {
    pub api_version: String,
    pub kind: String,
    pub request: AdmissionRequest,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewResponse {
    pub api_version: String,
    pub kind: String,
    pub response: AdmissionResponse,
}

impl AdmissionReviewResponse {
    pub fn new(response: AdmissionResponse) -> Self {
        AdmissionReviewResponse {
            api_version: String::from(ADMISSION_API_VERSION),
            kind: String::from(ADMISSION_REVIEW_KIND),
            response,
        }
    }
}

// What actually comes over the wire, before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    api_version: Option<String>,
    kind: Option<String>,
    request: Option<AdmissionRequest>,
}

pub fn decode(bytes: &[u8]) -> Result<AdmissionReviewRequest, DecodeError> {
    let envelope: Envelope = serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::MalformedEnvelope(e.to_string()))?;

    let api_version = match envelope.api_version {
        Some(v) if v == ADMISSION_API_VERSION => v,
        Some(v) => {
            return Err(DecodeError::MalformedEnvelope(format!(
                "unsupported apiVersion {v:?}, expected {ADMISSION_API_VERSION:?}"
            )))
        }
        None => {
            return Err(DecodeError::MalformedEnvelope(
                "apiVersion is missing".to_string(),
            ))
        }
    };

    let kind = envelope
        .kind
        .unwrap_or_else(|| ADMISSION_REVIEW_KIND.to_string());
    if kind != ADMISSION_REVIEW_KIND {
        return Err(DecodeError::MalformedEnvelope(format!(
            "unexpected kind {kind:?}, expected {ADMISSION_REVIEW_KIND:?}"
        )));
    }

    let request = envelope
        .request
        .ok_or_else(|| DecodeError::MalformedEnvelope("request is missing".to_string()))?;

    Ok(AdmissionReviewRequest {
        api_version,
        kind,
        request,
    })
}

pub fn encode(review: &AdmissionReviewResponse) -> Result<Vec<u8>, EncodeError> {
    serde_json::to_vec(review).map_err(EncodeError::Review)
}
