use crate::catalog;
use crate::errors::ConsoleError;

/// The five dispatchable pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LinkFinder,
    ArticleScraper,
    Embeddings,
    Analysis,
    FullPipeline,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LinkFinder => "link finder",
            Self::ArticleScraper => "article scraper",
            Self::Embeddings => "embeddings generation",
            Self::Analysis => "analysis",
            Self::FullPipeline => "full pipeline",
        }
    }
}

impl std::str::FromStr for Stage {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "link-finder" | "links" => Ok(Self::LinkFinder),
            "article-scraper" | "articles" => Ok(Self::ArticleScraper),
            "embeddings" => Ok(Self::Embeddings),
            "analysis" => Ok(Self::Analysis),
            "full" | "full-pipeline" => Ok(Self::FullPipeline),
            other => Err(ConsoleError::Validation(format!(
                "Unknown stage: {}. Use: link-finder, article-scraper, embeddings, analysis, full",
                other
            ))),
        }
    }
}

/// The operator's pending configuration: which scrapers to run and which
/// model to analyze with. Client-only; the backend first sees these values
/// inside a dispatch request.
#[derive(Debug, Clone)]
pub struct StageSelection {
    pub scrapers: Vec<String>,
    pub provider: String,
    pub model: String,
    pub temperature: Option<f32>,
}

impl Default for StageSelection {
    fn default() -> Self {
        let provider = "openai".to_string();
        let model = catalog::default_model(&provider).to_string();
        Self {
            scrapers: Vec::new(),
            provider,
            model,
            temperature: None,
        }
    }
}

impl StageSelection {
    /// Select every available scraper, the console's initial state.
    pub fn select_all(&mut self, available: &[String]) {
        self.scrapers = available.to_vec();
    }

    pub fn toggle_scraper(&mut self, name: &str) {
        if let Some(pos) = self.scrapers.iter().position(|s| s == name) {
            self.scrapers.remove(pos);
        } else {
            self.scrapers.push(name.to_string());
        }
    }

    /// Switch provider; the model resets to that provider's default so a
    /// stale model name never rides along with a new provider.
    pub fn set_provider(&mut self, provider: &str) {
        self.provider = provider.to_string();
        self.model = catalog::default_model(provider).to_string();
    }

    pub fn set_model(&mut self, model: &str) {
        self.model = model.to_string();
    }

    pub fn set_temperature(&mut self, temperature: f32) -> Result<(), ConsoleError> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConsoleError::Validation(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                temperature
            )));
        }
        self.temperature = Some(temperature);
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build a validated start command for a stage from the current
    /// selection.
    pub fn command(&self, stage: Stage) -> Result<StartCommand, ConsoleError> {
        let command = match stage {
            Stage::LinkFinder => StartCommand::LinkFinder {
                scrapers: self.scrapers.clone(),
            },
            Stage::ArticleScraper => StartCommand::ArticleScraper,
            Stage::Embeddings => StartCommand::Embeddings,
            Stage::Analysis => StartCommand::Analysis {
                provider: self.provider.clone(),
                model: self.model.clone(),
                temperature: self.temperature,
            },
            Stage::FullPipeline => StartCommand::FullPipeline {
                scrapers: self.scrapers.clone(),
                provider: self.provider.clone(),
                model: self.model.clone(),
                temperature: self.temperature,
            },
        };
        command.validate()?;
        Ok(command)
    }
}

/// A start command ready for dispatch. Validation is local and happens
/// before any network call.
#[derive(Debug, Clone)]
pub enum StartCommand {
    LinkFinder {
        scrapers: Vec<String>,
    },
    ArticleScraper,
    Embeddings,
    Analysis {
        provider: String,
        model: String,
        temperature: Option<f32>,
    },
    FullPipeline {
        scrapers: Vec<String>,
        provider: String,
        model: String,
        temperature: Option<f32>,
    },
}

impl StartCommand {
    pub fn stage(&self) -> Stage {
        match self {
            Self::LinkFinder { .. } => Stage::LinkFinder,
            Self::ArticleScraper => Stage::ArticleScraper,
            Self::Embeddings => Stage::Embeddings,
            Self::Analysis { .. } => Stage::Analysis,
            Self::FullPipeline { .. } => Stage::FullPipeline,
        }
    }

    pub fn label(&self) -> &'static str {
        self.stage().label()
    }

    /// Link discovery needs at least one scraper, directly or as part of
    /// the full chain. Analysis and the parameterless stages are always
    /// dispatchable.
    pub fn validate(&self) -> Result<(), ConsoleError> {
        match self {
            Self::LinkFinder { scrapers } | Self::FullPipeline { scrapers, .. }
                if scrapers.is_empty() =>
            {
                Err(ConsoleError::Validation(
                    "Select at least one scraper".into(),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scrapers_rejected_for_link_finder_and_full() {
        let selection = StageSelection::default();
        assert!(selection.command(Stage::LinkFinder).is_err());
        assert!(selection.command(Stage::FullPipeline).is_err());
        // No scraper precondition for the other stages
        assert!(selection.command(Stage::ArticleScraper).is_ok());
        assert!(selection.command(Stage::Embeddings).is_ok());
        assert!(selection.command(Stage::Analysis).is_ok());
    }

    #[test]
    fn provider_switch_resets_model() {
        let mut selection = StageSelection::default();
        assert_eq!(selection.model, "gpt-4o");
        selection.set_model("gpt-3.5-turbo");
        selection.set_provider("groq");
        assert_eq!(selection.model, "llama3-8b-8192");
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut selection = StageSelection::default();
        selection.toggle_scraper("economymiddleeast");
        assert_eq!(selection.scrapers, vec!["economymiddleeast"]);
        selection.toggle_scraper("economymiddleeast");
        assert!(selection.scrapers.is_empty());
    }

    #[test]
    fn temperature_bounds_enforced() {
        let mut selection = StageSelection::default();
        assert!(selection.set_temperature(2.5).is_err());
        selection.set_temperature(0.2).unwrap();
        assert_eq!(selection.temperature, Some(0.2));
    }

    #[test]
    fn stage_parses_cli_names() {
        use std::str::FromStr;
        assert_eq!(Stage::from_str("link-finder").unwrap(), Stage::LinkFinder);
        assert_eq!(Stage::from_str("full").unwrap(), Stage::FullPipeline);
        assert!(Stage::from_str("bogus").is_err());
    }
}
