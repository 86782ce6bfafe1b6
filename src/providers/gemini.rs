use serde::{Deserialize, Serialize};
use serde_json::Value;
use async_trait::async_trait;
use log::{debug, trace, error};

use crate::config::ModelConfig;
use crate::error::Error;
use crate::request::{Credential, OutputSchema, PromptSpec};

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part
{   #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content
{   #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>
  , #[serde(default)]
    pub parts: Vec<Part>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig
{   pub response_mime_type: String
  , pub response_schema: Value
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest
{   pub contents: Vec<Content>
  , pub generation_config: GenerationConfig
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate
{   #[serde(default)]
    pub content: Option<Content>
  , pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope
{   pub error: ApiErrorBody
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody
{   #[serde(default)]
    pub message: String
  , #[serde(default)]
    pub status: Option<String>
}

/// JSON schema for an object with one required string field
pub fn response_schema(output: &OutputSchema) -> Value
{   let mut properties = serde_json::Map::new();
    properties.insert(
      output.field.clone()
    , serde_json::json!({
        "type": "STRING",
        "description": output.description
      })
    );
    serde_json::json!({
      "type": "OBJECT",
      "properties": properties,
      "required": [output.field]
    })
}

impl GenerateContentRequest
{   pub fn from_spec(spec: &PromptSpec) -> Self
    {   GenerateContentRequest
        {   contents: vec![
              Content
              {   role: Some("user".to_string())
                , parts: vec![Part { text: Some(spec.text.clone()) }]
              }
            ]
          , generation_config: GenerationConfig
            {   response_mime_type: "application/json".to_string()
              , response_schema: response_schema(&spec.output)
            }
        }
    }
}

/// Best human-readable message from a non-success body
fn api_error_message(status: reqwest::StatusCode, body: &str) -> String
{   match serde_json::from_str::<ApiErrorEnvelope>(body)
    {   Ok(env) if !env.error.message.trim().is_empty() => env.error.message
      , _ if !body.trim().is_empty() => {
          format!("Model API returned {}: {}", status, body.trim())
        }
      , _ => format!("Model API returned {}", status)
    }
}

/// Pull the declared field out of a `generateContent` response
pub fn extract_output(
  response: &GenerateContentResponse
, output_field: &str
) -> Result<String, Error>
{   let candidate = response.candidates.first()
      .ok_or_else(|| {
        error!("No candidates in response");
        Error::NoCandidates
      })?;

    let raw: String = candidate.content
      .as_ref()
      .map(|c| {
        c.parts
          .iter()
          .filter_map(|p| p.text.as_deref())
          .collect()
      })
      .unwrap_or_default();

    if raw.trim().is_empty()
    {   error!(
          "Empty candidate (finish reason: {:?})",
          candidate.finish_reason
        );
        return Err(Error::NoCandidates);
    }

    let value: Value = serde_json::from_str(raw.trim())
      .map_err(|e| {
        error!("Structured output is not JSON: {}", e);
        Error::ParseError(e.to_string())
      })?;

    match value.get(output_field)
    {   Some(Value::String(text)) => Ok(text.clone())
      , Some(other) => {
          error!("Field {} is not a string", output_field);
          Err(Error::ParseError(format!(
            "'{}' should be a string, got {}",
            output_field, other
          )))
        }
      , None => {
          error!("Field {} missing from output", output_field);
          Err(Error::MissingOutputField(output_field.to_string()))
        }
    }
}

/// Gemini client scoped to one credential
pub struct GeminiClient
{   api_key: Credential
  , config: ModelConfig
  , http_client: reqwest::Client
}

impl GeminiClient
{   pub fn new(api_key: Credential, config: ModelConfig) -> Self
    {   debug!("Creating GeminiClient for model: {}", config.model);
        let mut builder = reqwest::Client::builder();
        if !config.use_system_proxy
        {   builder = builder.no_proxy();
        }
        let http_client = builder.build().unwrap_or_else(|e| {
          error!("Falling back to default HTTP client: {}", e);
          reqwest::Client::new()
        });
        GeminiClient
        {   api_key
          , config
          , http_client
        }
    }

    fn endpoint(&self) -> String
    {   format!(
          "{}/models/{}:generateContent",
          self.config.api_base.trim_end_matches('/'),
          self.config.model
        )
    }

    async fn handle_generate(
      &self
    , spec: &PromptSpec
    ) -> Result<String, Error>
    {   debug!(
          "Handling generate for {} with model {}",
          spec.content_type.id(), self.config.model
        );

        let request = GenerateContentRequest::from_spec(spec);
        if self.config.verbose
        {   trace!("Gemini request: {:?}", request);
        }

        let response = self.http_client
          .post(self.endpoint())
          .header("x-goog-api-key", self.api_key.expose())
          .header("Content-Type", "application/json")
          .json(&request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("Gemini response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_default();
            let message = api_error_message(status, &error_text);
            error!("Gemini API error: {}", message);
            return Err(Error::ApiError(message));
        }

        let body: GenerateContentResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            Error::ParseError(e.to_string())
          })?;

        if self.config.verbose
        {   trace!("Gemini response: {:?}", body);
        }

        extract_output(&body, &spec.output.field)
    }
}

#[async_trait]
impl super::ModelClient for GeminiClient
{   async fn generate(&self, spec: &PromptSpec) -> Result<String, Error>
    {   self.handle_generate(spec).await
    }
}

/// Builds a fresh `GeminiClient` for every credential it is handed
#[derive(Debug, Clone, Default)]
pub struct GeminiConnector
{   pub config: ModelConfig
}

impl GeminiConnector
{   pub fn new(config: ModelConfig) -> Self
    {   GeminiConnector { config }
    }
}

impl super::Connector for GeminiConnector
{   fn connect(&self, credential: &Credential)
      -> Box<dyn super::ModelClient>
    {   Box::new(GeminiClient::new(credential.clone(), self.config.clone()))
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    fn response(json: &str) -> GenerateContentResponse
    {   serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_body_shape()
    {   let spec = PromptSpec
        {   content_type: crate::ContentType::Tagline
          , text: "Write taglines".to_string()
          , output: OutputSchema
            {   field: "tagline".to_string()
              , description: "A tagline".to_string()
            }
        };
        let body = serde_json::to_value(GenerateContentRequest::from_spec(&spec))
          .unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Write taglines");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        let schema = &body["generationConfig"]["responseSchema"];
        assert_eq!(schema["properties"]["tagline"]["type"], "STRING");
        assert_eq!(schema["required"][0], "tagline");
    }

    #[test]
    fn extracts_declared_field_unmodified()
    {   let text = "1. Option 1...\n\n2. Option 2...\n\n3. Option 3...";
        let inner = serde_json::json!({ "bio": text }).to_string();
        let outer = serde_json::json!({
          "candidates": [{ "content": { "parts": [{ "text": inner }] } }]
        }).to_string();
        assert_eq!(extract_output(&response(&outer), "bio"), Ok(text.to_string()));
    }

    #[test]
    fn missing_field_is_an_error()
    {   let outer = serde_json::json!({
          "candidates": [{ "content": { "parts": [{ "text": "{\"post\":\"hi\"}" }] } }]
        }).to_string();
        assert_eq!(
          extract_output(&response(&outer), "bio"),
          Err(Error::MissingOutputField("bio".to_string()))
        );
    }

    #[test]
    fn no_candidates_and_bad_json()
    {   assert_eq!(
          extract_output(&response(r#"{"candidates":[]}"#), "bio"),
          Err(Error::NoCandidates)
        );
        let outer = serde_json::json!({
          "candidates": [{ "content": { "parts": [{ "text": "not json" }] } }]
        }).to_string();
        assert!(matches!(
          extract_output(&response(&outer), "bio"),
          Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn api_error_prefers_model_message()
    {   let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
          api_error_message(reqwest::StatusCode::BAD_REQUEST, body),
          "API key not valid."
        );
        assert_eq!(
          api_error_message(reqwest::StatusCode::BAD_GATEWAY, ""),
          "Model API returned 502 Bad Gateway"
        );
    }

    #[test]
    fn endpoint_uses_config()
    {   let client = GeminiClient::new(
          Credential::new("k").unwrap()
        , ModelConfig::default().with_api_base("http://localhost:9/v1/")
        );
        assert_eq!(
          client.endpoint(),
          "http://localhost:9/v1/models/gemini-2.5-flash:generateContent"
        );
    }
}
