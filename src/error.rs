use std::fmt;

/// Message shown when a generation is attempted without a key
pub const MISSING_CREDENTIAL_MESSAGE: &str
  = "API key is not configured. Please add it in the settings.";

/// Fallback message when the model gives nothing better
pub const GENERIC_FAILURE_MESSAGE: &str
  = "Failed to generate content.";

/// Broad category of an error, as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind
{   /// Credential missing or settings malformed
    Configuration
  , /// Input failed a schema constraint
    Validation
  , /// The model call failed
    Generation
}

/// Custom error type for SabiWriter operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// No API key supplied for the request
    MissingCredential
  , /// Invalid configuration value
    InvalidConfiguration(String)
  , /// A request field is shorter than its schema allows
    Validation
    {   field: &'static str
      , min_len: usize
      , message: &'static str
    }
  , /// HTTP transport error
    HttpError(String)
  , /// API returned an error response
    ApiError(String)
  , /// Failed to parse API response
    ParseError(String)
  , /// Structured output lacked the declared field
    MissingOutputField(String)
  , /// No candidates in API response
    NoCandidates
  , /// Caller cancelled the generation
    Cancelled
  , /// Generic error
    Other(String)
}

impl Error
{   /// Which part of the taxonomy this error belongs to
    pub fn kind(&self) -> ErrorKind
    {   match self
        {   Error::MissingCredential
          | Error::InvalidConfiguration(_) => ErrorKind::Configuration
          , Error::Validation { .. } => ErrorKind::Validation
          , _ => ErrorKind::Generation
        }
    }

    /// Short message suitable for showing to a user as is
    pub fn user_message(&self) -> String
    {   match self
        {   Error::MissingCredential => {
              MISSING_CREDENTIAL_MESSAGE.to_string()
            }
          , Error::Validation { message, .. } => message.to_string()
          , Error::ApiError(msg)
          | Error::HttpError(msg)
          | Error::ParseError(msg)
          | Error::Other(msg) if msg.trim().is_empty() => {
              GENERIC_FAILURE_MESSAGE.to_string()
            }
          , other => other.to_string()
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingCredential => {
              write!(f, "{}", MISSING_CREDENTIAL_MESSAGE)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Validation { message, .. } => {
              write!(f, "{}", message)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "{}", msg)
            }
          , Error::ParseError(msg) => {
              write!(f, "Could not read model output: {}", msg)
            }
          , Error::MissingOutputField(field) => {
              write!(f,
                "Model output did not contain '{}'",
                field
              )
            }
          , Error::NoCandidates => {
              write!(f, "The model returned no content")
            }
          , Error::Cancelled => {
              write!(f, "Generation was cancelled.")
            }
          , Error::Other(msg) => {
              write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn missing_credential_is_configuration()
    {   let err = Error::MissingCredential;
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.user_message(), MISSING_CREDENTIAL_MESSAGE);
    }

    #[test]
    fn empty_api_message_falls_back()
    {   let err = Error::ApiError("  ".to_string());
        assert_eq!(err.kind(), ErrorKind::Generation);
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn validation_uses_form_message()
    {   let err = Error::Validation
        {   field: "topic"
          , min_len: 10
          , message: "Please provide a topic for the post."
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Please provide a topic for the post.");
    }
}
