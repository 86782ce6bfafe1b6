//! Request and result types shared by the prompt builder and dispatcher

use std::fmt;
use serde::{Deserialize, Serialize};
use log::debug;

use crate::error::Error;
use crate::schema::{get_schema, ContentType, FieldKind, Tone};

/// Free-text inputs, one variant per content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentFields
{   #[serde(rename_all = "camelCase")]
    InstagramBio
    {   business_name: String
      , business_description: String
      , value_proposition: String
      , call_to_action: String
    }
  , #[serde(rename_all = "camelCase")]
    WhatsAppDescription
    {   business_name: String
      , industry: String
    }
  , #[serde(rename_all = "camelCase")]
    Tagline
    {   business_description: String
    }
  , #[serde(rename_all = "camelCase")]
    ProductDescription
    {   product_name: String
      , product_features: String
    }
  , TwitterPost
    {   topic: String
    }
  , FacebookPost
    {   topic: String
    }
}

impl ContentFields
{   pub fn content_type(&self) -> ContentType
    {   match self
        {   ContentFields::InstagramBio { .. } => ContentType::InstagramBio
          , ContentFields::WhatsAppDescription { .. } => {
              ContentType::WhatsAppDescription
            }
          , ContentFields::Tagline { .. } => ContentType::Tagline
          , ContentFields::ProductDescription { .. } => {
              ContentType::ProductDescription
            }
          , ContentFields::TwitterPost { .. } => ContentType::TwitterPost
          , ContentFields::FacebookPost { .. } => ContentType::FacebookPost
        }
    }

    /// Text fields paired with their schema names, in schema order
    pub fn values(&self) -> Vec<(&'static str, &str)>
    {   match self
        {   ContentFields::InstagramBio
            {   business_name
              , business_description
              , value_proposition
              , call_to_action
            } => vec![
              ("businessName", business_name.as_str())
            , ("businessDescription", business_description.as_str())
            , ("valueProposition", value_proposition.as_str())
            , ("callToAction", call_to_action.as_str())
            ]
          , ContentFields::WhatsAppDescription { business_name, industry } => {
              vec![
                ("businessName", business_name.as_str())
              , ("industry", industry.as_str())
              ]
            }
          , ContentFields::Tagline { business_description } => {
              vec![("businessDescription", business_description.as_str())]
            }
          , ContentFields::ProductDescription
            {   product_name
              , product_features
            } => vec![
              ("productName", product_name.as_str())
            , ("productFeatures", product_features.as_str())
            ]
          , ContentFields::TwitterPost { topic }
          | ContentFields::FacebookPost { topic } => {
              vec![("topic", topic.as_str())]
            }
        }
    }

    /// Value of one text field by its schema name
    pub fn value(&self, name: &str) -> Option<&str>
    {   self.values()
          .into_iter()
          .find(|(n, _)| *n == name)
          .map(|(_, v)| v)
    }
}

/// One user submission: text inputs plus style preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest
{   pub fields: ContentFields
  , pub tone: Tone
  , pub include_emojis: bool
}

impl ContentRequest
{   pub fn new(fields: ContentFields, tone: Tone, include_emojis: bool)
      -> Self
    {   ContentRequest { fields, tone, include_emojis }
    }

    /// Build a request using the tone and emoji preference from settings
    pub fn with_settings(
      fields: ContentFields
    , settings: &crate::config::Settings
    ) -> Self
    {   ContentRequest::new(fields, settings.tone, settings.include_emojis)
    }

    pub fn content_type(&self) -> ContentType
    {   self.fields.content_type()
    }

    /// Check every text field against its schema minimum length
    pub fn validate(&self) -> Result<(), Error>
    {   let schema = get_schema(self.content_type());
        for spec in schema.input_fields
          .iter()
          .filter(|f| f.kind == FieldKind::Text)
        {   let value = self.fields.value(spec.name).unwrap_or("");
            if value.trim().chars().count() < spec.min_len
            {   debug!(
                  "Validation failed for {}.{}",
                  self.content_type().id(), spec.name
                );
                return Err(Error::Validation
                {   field: spec.name
                  , min_len: spec.min_len
                  , message: spec.message
                });
            }
        }
        Ok(())
    }
}

/// Single-field output shape the model must fill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema
{   pub field: String
  , pub description: String
}

/// Rendered prompt plus declared output shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSpec
{   pub content_type: ContentType
  , pub text: String
  , pub output: OutputSchema
}

/// Outcome of one generation, the only value handed back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GenerationResult
{   Success { text: String }
  , Failure { message: String }
}

impl GenerationResult
{   pub fn is_success(&self) -> bool
    {   matches!(self, GenerationResult::Success { .. })
    }

    pub fn text(&self) -> Option<&str>
    {   match self
        {   GenerationResult::Success { text } => Some(text)
          , GenerationResult::Failure { .. } => None
        }
    }

    pub fn message(&self) -> Option<&str>
    {   match self
        {   GenerationResult::Success { .. } => None
          , GenerationResult::Failure { message } => Some(message)
        }
    }
}

impl From<Result<String, Error>> for GenerationResult
{   fn from(res: Result<String, Error>) -> Self
    {   match res
        {   Ok(text) => GenerationResult::Success { text }
          , Err(e) => e.into()
        }
    }
}

impl From<Error> for GenerationResult
{   fn from(e: Error) -> Self
    {   GenerationResult::Failure { message: e.user_message() }
    }
}

/// Opaque model API key, supplied per request
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential
{   /// Wrap a key; blank keys are rejected
    pub fn new(key: impl Into<String>) -> Result<Self, Error>
    {   let key = key.into();
        if key.trim().is_empty()
        {   return Err(Error::MissingCredential);
        }
        Ok(Credential(key))
    }

    /// Read a key from an environment variable
    pub fn from_env(var: &str) -> Result<Self, Error>
    {   match std::env::var(var)
        {   Ok(key) => Credential::new(key)
          , Err(_) => {
              debug!("Environment variable {} not set", var);
              Err(Error::MissingCredential)
            }
        }
    }

    pub fn expose(&self) -> &str
    {   &self.0
    }
}

impl fmt::Debug for Credential
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f, "Credential(***)")
    }
}
