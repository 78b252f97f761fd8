use k8s_openapi::api::core::v1::Container;

use crate::template::MutationTemplate;

/// An AdmissionReview for a Pod carrying a single `nginx` container.
/// `operation` is spliced in verbatim.
pub(crate) fn admission_review_json(operation: &str) -> String {
    format!(
        r#"
{{
    "apiVersion": "admission.k8s.io/v1",
    "kind": "AdmissionReview",
    "request": {{
        "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
        "kind": {{"group": "", "version": "v1", "kind": "Pod"}},
        "resource": {{"group": "", "version": "v1", "resource": "pods"}},
        "name": "web",
        "namespace": "default",
        "operation": "{operation}",
        "userInfo": {{
            "username": "admin",
            "uid": "014fbff9a07c",
            "groups": ["system:authenticated"]
        }},
        "object": {{
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {{"name": "web", "namespace": "default"}},
            "spec": {{
                "containers": [
                    {{"name": "nginx", "image": "nginx:1.27"}}
                ]
            }}
        }},
        "dryRun": false
    }}
}}
"#
    )
}

pub(crate) fn container(name: &str, image: &str) -> Container {
    Container {
        name: name.to_string(),
        image: Some(image.to_string()),
        ..Default::default()
    }
}

pub(crate) fn template_of(names: &[&str]) -> MutationTemplate {
    MutationTemplate::new(
        names
            .iter()
            .map(|name| container(name, "busybox"))
            .collect(),
    )
}
