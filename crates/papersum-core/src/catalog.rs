//! Built-in list of selectable models, used when the server does not report one.

use crate::ModelType;

/// A selectable model: wire value plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub value: &'static str,
    pub label: &'static str,
}

const OPENAI_MODELS: &[ModelOption] = &[
    ModelOption { value: "gpt-3.5-turbo", label: "GPT-3.5 Turbo" },
    ModelOption { value: "gpt-4", label: "GPT-4" },
    ModelOption { value: "gpt-4-turbo-preview", label: "GPT-4 Turbo" },
];

const OLLAMA_MODELS: &[ModelOption] = &[
    ModelOption { value: "llama2", label: "Llama 2" },
    ModelOption { value: "llama2:13b", label: "Llama 2 13B" },
    ModelOption { value: "llama2:70b", label: "Llama 2 70B" },
    ModelOption { value: "codellama", label: "Code Llama" },
    ModelOption { value: "mistral", label: "Mistral" },
    ModelOption { value: "neural-chat", label: "Neural Chat" },
    ModelOption { value: "starling-lm", label: "Starling LM" },
    ModelOption { value: "vicuna", label: "Vicuna" },
    ModelOption { value: "wizard-vicuna-uncensored", label: "Wizard Vicuna" },
];

pub fn options(model_type: ModelType) -> &'static [ModelOption] {
    match model_type {
        ModelType::OpenAi => OPENAI_MODELS,
        ModelType::Ollama => OLLAMA_MODELS,
    }
}

/// The model the backend falls back to for `model_type`.
pub fn default_model(model_type: ModelType) -> &'static str {
    options(model_type)[0].value
}

/// Display label for a model value, or the value itself if unknown.
pub fn label_for(value: &str) -> &str {
    OPENAI_MODELS
        .iter()
        .chain(OLLAMA_MODELS)
        .find(|o| o.value == value)
        .map(|o| o.label)
        .unwrap_or(value)
}
