use k8s_openapi::api::core::v1::Container;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The containers to inject into every admitted Pod, in injection order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationTemplate {
    #[serde(default)]
    containers: Vec<Container>,
}

impl MutationTemplate {
    pub fn new(containers: Vec<Container>) -> Self {
        Self { containers }
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// The template used when no sidecar configuration file is given:
/// a single `ubuntu` container that sleeps for a day.
pub fn default_template() -> MutationTemplate {
    MutationTemplate::new(vec![Container {
        name: "sidecar".to_string(),
        image: Some("ubuntu".to_string()),
        image_pull_policy: Some("Always".to_string()),
        command: Some(vec!["sleep".to_string(), "1d".to_string()]),
        ..Default::default()
    }])
}

/// Identifies the admission request a template is looked up for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateKey {
    pub uid: String,
    pub namespace: Option<String>,
}

/// Source of mutation templates.
///
/// Implementations are shared by all the in-flight requests, hence they must
/// be cheap to query and must never change a template once handed out.
pub trait TemplateSource: Send + Sync {
    fn template_for(&self, key: &TemplateKey) -> Arc<MutationTemplate>;
}

/// Hands out the same template regardless of the request.
#[derive(Clone, Debug)]
pub struct StaticTemplateSource {
    template: Arc<MutationTemplate>,
}

impl StaticTemplateSource {
    pub fn new(template: MutationTemplate) -> Self {
        Self {
            template: Arc::new(template),
        }
    }
}

impl TemplateSource for StaticTemplateSource {
    fn template_for(&self, _key: &TemplateKey) -> Arc<MutationTemplate> {
        self.template.clone()
    }
}
