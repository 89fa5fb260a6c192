// Forms service - Use case for listing selectable forms
use crate::application::sources::FormCatalog;
use crate::domain::form::Form;
use std::sync::Arc;

#[derive(Clone)]
pub struct FormsService {
    catalog: Arc<dyn FormCatalog>,
}

impl FormsService {
    pub fn new(catalog: Arc<dyn FormCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn list_forms(&self) -> anyhow::Result<Vec<Form>> {
        self.catalog.list_forms().await
    }
}
