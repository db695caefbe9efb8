//! Records every dialog the view model raises

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::dialogs::{PromptResult, UserDialogs};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DialogEvent {
    ShowLoading(String),
    HideLoading,
    Alert(String),
    Prompt {
        message: String,
        title: String,
        placeholder: String,
    },
}

pub struct MockDialogs {
    events: Mutex<Vec<DialogEvent>>,
    prompt_response: Mutex<PromptResult>,
}

impl MockDialogs {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            prompt_response: Mutex::new(PromptResult::accepted("")),
        }
    }

    pub fn answer_prompt(&self, response: PromptResult) {
        *self.prompt_response.lock().unwrap() = response;
    }

    pub fn events(&self) -> Vec<DialogEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DialogEvent::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn record(&self, event: DialogEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl UserDialogs for MockDialogs {
    fn show_loading(&self, title: &str) {
        self.record(DialogEvent::ShowLoading(title.to_string()));
    }

    fn hide_loading(&self) {
        self.record(DialogEvent::HideLoading);
    }

    async fn alert(&self, message: &str) {
        self.record(DialogEvent::Alert(message.to_string()));
    }

    async fn prompt(&self, message: &str, title: &str, placeholder: &str) -> PromptResult {
        self.record(DialogEvent::Prompt {
            message: message.to_string(),
            title: title.to_string(),
            placeholder: placeholder.to_string(),
        });
        self.prompt_response.lock().unwrap().clone()
    }
}
