//! Fallback provider/model catalog, used when the backend's models
//! endpoint is unreachable and to seed the console's defaults.

pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub models: &'static [ModelInfo],
}

pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub recommended: bool,
}

pub static PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        id: "openai",
        name: "OpenAI",
        models: &[
            ModelInfo { id: "gpt-4o", label: "GPT-4o", recommended: true },
            ModelInfo { id: "gpt-4-turbo", label: "GPT-4 Turbo", recommended: false },
            ModelInfo { id: "gpt-3.5-turbo", label: "GPT-3.5 Turbo", recommended: false },
        ],
    },
    ProviderInfo {
        id: "groq",
        name: "Groq",
        models: &[
            ModelInfo { id: "llama3-8b-8192", label: "Llama3 8B", recommended: true },
            ModelInfo { id: "llama3-70b-8192", label: "Llama3 70B", recommended: false },
            ModelInfo { id: "mixtral-8x7b-32768", label: "Mixtral 8x7B", recommended: false },
            ModelInfo { id: "gemma-7b-it", label: "Gemma 7B", recommended: false },
        ],
    },
];

pub fn get_provider(id: &str) -> Option<&'static ProviderInfo> {
    PROVIDERS.iter().find(|p| p.id == id)
}

/// The recommended model for a provider, falling back to its first entry.
pub fn default_model(provider_id: &str) -> &'static str {
    if let Some(provider) = get_provider(provider_id) {
        provider.models.iter()
            .find(|m| m.recommended)
            .map(|m| m.id)
            .unwrap_or(provider.models[0].id)
    } else {
        "gpt-4o"
    }
}

/// Build the same provider → models map the backend serves, from the
/// static catalog.
pub fn fallback_catalog() -> crate::api::models::ModelCatalog {
    PROVIDERS
        .iter()
        .map(|p| (p.id.to_string(), p.models.iter().map(|m| m.id.to_string()).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_tracks_recommendation() {
        assert_eq!(default_model("openai"), "gpt-4o");
        assert_eq!(default_model("groq"), "llama3-8b-8192");
        assert_eq!(default_model("unknown"), "gpt-4o");
    }

    #[test]
    fn fallback_catalog_covers_all_providers() {
        let catalog = fallback_catalog();
        assert_eq!(catalog.len(), PROVIDERS.len());
        assert!(catalog["groq"].contains(&"mixtral-8x7b-32768".to_string()));
    }
}
