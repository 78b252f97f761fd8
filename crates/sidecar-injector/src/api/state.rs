use std::sync::Arc;

use crate::template::TemplateSource;

pub(crate) struct ApiServerState {
    pub(crate) template_source: Arc<dyn TemplateSource>,
}
