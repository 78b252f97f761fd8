use base64::{engine::general_purpose, Engine as _};

use crate::admission_review::{
    AdmissionResponse, AdmissionResponseStatus, AdmissionReviewResponse, PatchType,
};
use crate::errors::EncodeError;
use crate::patch::PatchSet;

const DENIED_CODE: u16 = 403;

/// Outcome of an admission review
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

/// Assemble the AdmissionReview answering the request identified by `uid`.
///
/// The patch is embedded only when the request is allowed and the patch set
/// is not empty.
pub fn build(
    uid: &str,
    decision: Decision,
    patch_set: &PatchSet,
) -> Result<AdmissionReviewResponse, EncodeError> {
    let response = match decision {
        Decision::Allow if patch_set.is_empty() => AdmissionResponse {
            uid: uid.to_owned(),
            allowed: true,
            ..Default::default()
        },
        Decision::Allow => AdmissionResponse {
            uid: uid.to_owned(),
            allowed: true,
            patch_type: Some(PatchType::JSONPatch),
            patch: Some(general_purpose::STANDARD.encode(patch_set.to_json()?)),
            status: None,
        },
        Decision::Deny(message) => AdmissionResponse {
            uid: uid.to_owned(),
            allowed: false,
            status: Some(AdmissionResponseStatus {
                message: Some(message),
                code: Some(DENIED_CODE),
            }),
            ..Default::default()
        },
    };

    Ok(AdmissionReviewResponse::new(response))
}
