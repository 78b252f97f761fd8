use tracing::{debug, info, Span};

use crate::{
    admission_review::{self, AdmissionRequest, AdmissionReviewResponse, Operation},
    errors::PipelineError,
    patch::{self, PatchSet},
    response::{self, Decision},
    target,
    template::{TemplateKey, TemplateSource},
};

const POD_KIND: &str = "Pod";

/// Turn the body of an admission review into the body of its answer.
pub(crate) fn mutate(
    template_source: &dyn TemplateSource,
    body: &[u8],
) -> Result<Vec<u8>, PipelineError> {
    let review = admission_review::decode(body)?;
    debug!(admission_review = ?review, "admission review decoded");

    let adm_req = review.request;
    populate_span_with_admission_request_data(&adm_req);
    info!(
        kind = adm_req.kind.kind.as_str(),
        operation = %adm_req.operation,
        request_uid = adm_req.uid.as_str(),
        "admission review received"
    );

    let response = if adm_req.operation != Operation::Create || !is_core_pod(&adm_req) {
        info!("not a Pod creation, letting it through untouched");
        response::build(&adm_req.uid, Decision::Allow, &PatchSet::default())?
    } else {
        let pod = target::extract(adm_req.object.as_ref())?;

        let template = template_source.template_for(&TemplateKey {
            uid: adm_req.uid.clone(),
            namespace: adm_req.namespace.clone(),
        });
        let patch_set = patch::create_patch(&pod, &template);

        response::build(&adm_req.uid, Decision::Allow, &patch_set)?
    };

    populate_span_with_admission_response_data(&response);
    debug!(response = ?response.response, "admission review answered");

    Ok(admission_review::encode(&response)?)
}

fn is_core_pod(adm_req: &AdmissionRequest) -> bool {
    adm_req.kind.group.is_empty() && adm_req.kind.kind == POD_KIND
}

fn populate_span_with_admission_request_data(adm_req: &AdmissionRequest) {
    Span::current().record("request_uid", adm_req.uid.as_str());
    Span::current().record("kind", adm_req.kind.kind.as_str());
    Span::current().record("kind_group", adm_req.kind.group.as_str());
    Span::current().record("kind_version", adm_req.kind.version.as_str());
    Span::current().record("name", adm_req.name.clone().unwrap_or_default().as_str());
    Span::current().record(
        "namespace",
        adm_req.namespace.clone().unwrap_or_default().as_str(),
    );
    Span::current().record("operation", adm_req.operation.as_str());
    Span::current().record("resource", adm_req.resource.resource.as_str());
}

fn populate_span_with_admission_response_data(review: &AdmissionReviewResponse) {
    Span::current().record("allowed", review.response.allowed);
    Span::current().record("mutated", review.response.patch.is_some());
}
