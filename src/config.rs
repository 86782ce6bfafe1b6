//! Configuration for the model endpoint and caller settings

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::schema::{ContentType, Tone};

pub const DEFAULT_API_BASE: &str
  = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Model endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig
{   /// API base URL
    pub api_base: String
  , /// Model name
    pub model: String
  , /// Trace request and response bodies
    #[serde(default)]
    pub verbose: bool
  , /// Honour HTTP(S)_PROXY from the environment
    #[serde(default = "default_true")]
    pub use_system_proxy: bool
}

impl Default for ModelConfig
{   fn default() -> Self
    {   ModelConfig
        {   api_base: DEFAULT_API_BASE.to_string()
          , model: DEFAULT_MODEL.to_string()
          , verbose: false
          , use_system_proxy: true
        }
    }
}

impl ModelConfig
{   pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self
    {   self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self
    {   self.model = model.into();
        self
    }

    pub fn with_system_proxy(mut self, use_system_proxy: bool) -> Self
    {   self.use_system_proxy = use_system_proxy;
        self
    }
}

/// Caller-resolved preferences, passed by value into every call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings
{   #[serde(default)]
    pub tone: Tone
  , #[serde(default = "default_true")]
    pub include_emojis: bool
  , /// Generator ids shown in navigation
    #[serde(default = "all_generators")]
    pub enabled_generators: Vec<ContentType>
}

fn default_true() -> bool
{   true
}

fn all_generators() -> Vec<ContentType>
{   ContentType::ALL.to_vec()
}

impl Default for Settings
{   fn default() -> Self
    {   Settings
        {   tone: Tone::default()
          , include_emojis: true
          , enabled_generators: all_generators()
        }
    }
}

impl Settings
{   pub fn is_enabled(&self, content_type: ContentType) -> bool
    {   self.enabled_generators.contains(&content_type)
    }

    /// Flip a generator on or off, keeping `ContentType::ALL` order
    pub fn toggle_generator(&mut self, content_type: ContentType)
    {   let enabled = !self.is_enabled(content_type);
        self.enabled_generators = ContentType::ALL
          .iter()
          .copied()
          .filter(|ct| {
            if *ct == content_type { enabled } else { self.is_enabled(*ct) }
          })
          .collect();
    }

    pub fn from_json(json: &str) -> Result<Self, Error>
    {   serde_json::from_str(json).map_err(|e| {
          Error::InvalidConfiguration(e.to_string())
        })
    }

    pub fn to_json(&self) -> Result<String, Error>
    {   serde_json::to_string(self).map_err(|e| {
          Error::InvalidConfiguration(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn defaults()
    {   let settings = Settings::default();
        assert_eq!(settings.tone, Tone::Nigerian);
        assert!(settings.include_emojis);
        assert!(ContentType::ALL.iter().all(|ct| settings.is_enabled(*ct)));

        let model = ModelConfig::default();
        assert_eq!(model.model, "gemini-2.5-flash");
    }

    #[test]
    fn missing_keys_take_defaults()
    {   let settings = Settings::from_json(r#"{"tone":"Witty"}"#).unwrap();
        assert_eq!(settings.tone, Tone::Witty);
        assert!(settings.include_emojis);
        assert_eq!(settings.enabled_generators.len(), 6);
    }

    #[test]
    fn unknown_tone_is_rejected()
    {   let err = Settings::from_json(r#"{"tone":"Grumpy"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn toggle_generator_round_trip()
    {   let mut settings = Settings::default();
        settings.toggle_generator(ContentType::Tagline);
        assert!(!settings.is_enabled(ContentType::Tagline));
        settings.toggle_generator(ContentType::Tagline);
        assert_eq!(settings.enabled_generators, ContentType::ALL.to_vec());
    }
}
