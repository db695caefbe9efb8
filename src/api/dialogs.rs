use async_trait::async_trait;

/// Modal dialogs the screen can raise.
#[async_trait]
pub trait UserDialogs: Send + Sync {
    fn show_loading(&self, title: &str);

    /// Hiding an indicator that is not shown is a no-op.
    fn hide_loading(&self);

    /// Resolves once the user dismisses the alert.
    async fn alert(&self, message: &str);

    async fn prompt(&self, message: &str, title: &str, placeholder: &str) -> PromptResult;
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PromptResult {
    pub ok: bool,
    pub text: String,
}

impl PromptResult {
    pub fn accepted(text: impl Into<String>) -> Self {
        PromptResult {
            ok: true,
            text: text.into(),
        }
    }

    pub fn cancelled() -> Self {
        PromptResult::default()
    }
}
