use std::sync::Mutex;

/// Blocking user-facing messages: an alert to acknowledge, or a yes/no
/// confirmation.
pub trait Prompt: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

/// Answers every confirmation the same way and keeps the alerts it was
/// shown. One is built per interaction.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answer: bool,
    alerts: Mutex<Vec<String>>,
    confirmations: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }
}

impl Prompt for ScriptedPrompt {
    fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_owned());
        }
    }

    fn confirm(&self, message: &str) -> bool {
        if let Ok(mut asked) = self.confirmations.lock() {
            asked.push(message.to_owned());
        }
        self.answer
    }
}
