use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use papersum_core::catalog;
use papersum_core::{ModelConfig, ModelInfo, ModelType};

/// How long a success/error icon stays colored after a model operation.
pub const STATUS_FLASH: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// A model operation awaiting its response. Test and switch are disabled meanwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelBusy {
    Testing,
    Switching,
}

impl ModelBusy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Testing => "Testing model...",
            Self::Switching => "Switching model...",
        }
    }
}

/// Last model status message. `flash_until` is set while the icon is still colored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStatus {
    pub kind: StatusKind,
    pub message: String,
    pub flash_until: Option<Instant>,
}

/// Selectable choice in the model-name picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChoice {
    pub value: String,
    pub label: String,
}

/// State of the model control panel.
#[derive(Debug, Clone)]
pub struct ModelPanel {
    pub selected_type: ModelType,
    pub selected_index: usize,
    /// Model lists reported by the server, if it sent any.
    pub available: BTreeMap<String, Vec<String>>,
    /// The model the server says is active.
    pub current: Option<ModelConfig>,
    pub busy: Option<ModelBusy>,
    pub status: Option<ModelStatus>,
}

impl Default for ModelPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelPanel {
    pub fn new() -> Self {
        Self {
            selected_type: ModelType::OpenAi,
            selected_index: 0,
            available: BTreeMap::new(),
            current: None,
            busy: None,
            status: None,
        }
    }

    /// Choices for the selected type: the server's list when present, else the built-in catalog.
    pub fn choices(&self) -> Vec<ModelChoice> {
        match self.available.get(self.selected_type.as_str()) {
            Some(names) if !names.is_empty() => names
                .iter()
                .map(|name| ModelChoice {
                    value: name.clone(),
                    label: catalog::label_for(name).to_string(),
                })
                .collect(),
            _ => catalog::options(self.selected_type)
                .iter()
                .map(|opt| ModelChoice {
                    value: opt.value.to_string(),
                    label: opt.label.to_string(),
                })
                .collect(),
        }
    }

    pub fn selected_choice(&self) -> Option<ModelChoice> {
        self.choices().into_iter().nth(self.selected_index)
    }

    /// Change type and repopulate the name list from the first entry.
    pub fn cycle_type(&mut self) {
        self.selected_type = self.selected_type.next();
        self.selected_index = 0;
    }

    pub fn next_name(&mut self) {
        let len = self.choices().len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1) % len;
        }
    }

    pub fn prev_name(&mut self) {
        let len = self.choices().len();
        if len > 0 {
            self.selected_index = (self.selected_index + len - 1) % len;
        }
    }

    /// The selection as a switch request, validated.
    pub fn selected_config(&self) -> Result<ModelConfig, papersum_core::ValidationError> {
        let name = self.selected_choice().map(|c| c.value).unwrap_or_default();
        ModelConfig::new(self.selected_type, name)
    }

    /// Reflect the server's model info: current model and selection both follow it.
    pub fn apply_info(&mut self, info: &ModelInfo) {
        self.available = info.available_models.clone();
        self.set_current(info.current());
    }

    /// Record the active model and point the picker at it.
    pub fn set_current(&mut self, current: ModelConfig) {
        self.selected_type = current.model_type;
        self.selected_index = self
            .choices()
            .iter()
            .position(|c| c.value == current.model_name)
            .unwrap_or(0);
        self.current = Some(current);
    }

    pub fn set_status(&mut self, kind: StatusKind, message: impl Into<String>, now: Instant) {
        self.status = Some(ModelStatus {
            kind,
            message: message.into(),
            flash_until: Some(now + STATUS_FLASH),
        });
    }

    /// Reset the icon once its flash period is over. The message stays.
    pub fn expire_status(&mut self, now: Instant) {
        if let Some(status) = &mut self.status {
            if status.flash_until.is_some_and(|until| now >= until) {
                status.flash_until = None;
            }
        }
    }

    pub fn current_label(&self) -> String {
        match &self.current {
            Some(cfg) => cfg.display_name(),
            None => "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_type_resets_to_first_option() {
        let mut panel = ModelPanel::new();
        panel.next_name();
        assert_eq!(panel.selected_index, 1);
        panel.cycle_type();
        assert_eq!(panel.selected_type, ModelType::Ollama);
        assert_eq!(panel.selected_index, 0);
        assert_eq!(panel.selected_choice().unwrap().value, "llama2");
    }

    #[test]
    fn prev_name_wraps() {
        let mut panel = ModelPanel::new();
        panel.prev_name();
        assert_eq!(
            panel.selected_choice().unwrap().value,
            "gpt-4-turbo-preview"
        );
    }

    #[test]
    fn server_list_overrides_catalog() {
        let mut panel = ModelPanel::new();
        let mut available = BTreeMap::new();
        available.insert("ollama".to_string(), vec!["phi3".to_string(), "mistral".to_string()]);
        panel.apply_info(&ModelInfo {
            current_model_type: ModelType::Ollama,
            current_model: "mistral".into(),
            available_models: available,
        });

        assert_eq!(panel.selected_type, ModelType::Ollama);
        assert_eq!(panel.selected_index, 1);
        assert_eq!(panel.current_label(), "Ollama mistral");
        let values: Vec<_> = panel.choices().into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["phi3", "mistral"]);
    }

    #[test]
    fn status_icon_resets_after_flash() {
        let mut panel = ModelPanel::new();
        let start = Instant::now();
        panel.set_status(StatusKind::Success, "ok", start);

        panel.expire_status(start + Duration::from_secs(1));
        assert!(panel.status.as_ref().unwrap().flash_until.is_some());

        panel.expire_status(start + STATUS_FLASH);
        let status = panel.status.as_ref().unwrap();
        assert!(status.flash_until.is_none());
        assert_eq!(status.message, "ok");
    }
}
