use std::sync::Arc;

use crate::api::CallTaskApi;
use crate::call_task::{CallTaskForm, FormError};
use crate::config::PollSettings;
use crate::transcript::TranscriptViewer;

/// Owns the form and the transcript viewer for the most recently created call.
pub struct App {
    api: Arc<dyn CallTaskApi>,
    settings: PollSettings,
    form: CallTaskForm,
    created_id: Option<String>,
    viewer: Option<TranscriptViewer>,
}

impl App {
    pub fn new(api: Arc<dyn CallTaskApi>, settings: PollSettings) -> Self {
        Self {
            api,
            settings,
            form: CallTaskForm::new(),
            created_id: None,
            viewer: None,
        }
    }

    pub fn form(&self) -> &CallTaskForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CallTaskForm {
        &mut self.form
    }

    pub fn created_id(&self) -> Option<&str> {
        self.created_id.as_deref()
    }

    pub fn viewer(&self) -> Option<&TranscriptViewer> {
        self.viewer.as_ref()
    }

    /// Swaps the backend; the current viewer keeps polling the old one until replaced.
    pub fn set_api(&mut self, api: Arc<dyn CallTaskApi>) {
        self.api = api;
    }

    /// Submits the form and, on success, starts watching the new call.
    pub async fn submit(&mut self) -> Result<String, FormError> {
        let id = self.form.submit(self.api.as_ref()).await?;
        self.set_created_id(&id).await;
        Ok(id)
    }

    /// Replaces the watched call. A blank id clears the view.
    pub async fn set_created_id(&mut self, id: &str) {
        if let Some(old) = self.viewer.take() {
            old.unmount().await;
        }
        if id.trim().is_empty() {
            self.created_id = None;
            return;
        }
        self.created_id = Some(id.to_string());
        self.viewer = TranscriptViewer::mount(id, self.api.clone(), self.settings.clone());
    }

    pub async fn clear(&mut self) {
        self.set_created_id("").await;
    }
}
