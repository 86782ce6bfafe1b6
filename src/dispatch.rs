//! Credential gate, generation dispatch and the per-request state machine

use log::{debug, error, info};

use crate::error::Error;
use crate::prompt::build_prompt;
use crate::providers::Connector;
use crate::request::{ContentRequest, Credential, GenerationResult, PromptSpec};

/// Check a caller-supplied key before anything is dispatched.
///
/// Absent, empty and whitespace-only keys all fail with
/// `Error::MissingCredential`. No I/O happens here.
pub fn ensure_credential(credential: Option<&str>)
  -> Result<Credential, Error>
{   let checked = match credential
    {   Some(key) => Credential::new(key)
      , None => Err(Error::MissingCredential)
    };
    if checked.is_err()
    {   debug!("Credential gate rejected request");
    }
    checked
}

/// Lifecycle of one generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState
{   Idle
  , Dispatching
  , Succeeded
  , Failed
}

impl GenerationState
{   pub fn is_terminal(&self) -> bool
    {   matches!(self, GenerationState::Succeeded | GenerationState::Failed)
    }
}

/// Tracks one request through `Idle -> Dispatching -> Succeeded | Failed`
#[derive(Debug)]
pub struct GenerationFlow
{   state: GenerationState
}

impl Default for GenerationFlow
{   fn default() -> Self
    {   GenerationFlow { state: GenerationState::Idle }
    }
}

impl GenerationFlow
{   pub fn new() -> Self
    {   GenerationFlow::default()
    }

    pub fn state(&self) -> GenerationState
    {   self.state
    }

    /// Enter `Dispatching`; only legal from `Idle`
    pub fn begin_dispatch(&mut self) -> Result<(), Error>
    {   if self.state != GenerationState::Idle
        {   return Err(Error::Other(format!(
              "cannot dispatch from {:?}",
              self.state
            )));
        }
        debug!("Generation state: Idle -> Dispatching");
        self.state = GenerationState::Dispatching;
        Ok(())
    }

    /// Leave `Dispatching` exactly once, according to the outcome
    pub fn finish(&mut self, result: &GenerationResult)
      -> Result<GenerationState, Error>
    {   if self.state != GenerationState::Dispatching
        {   return Err(Error::Other(format!(
              "cannot finish from {:?}",
              self.state
            )));
        }
        self.state = if result.is_success()
        {   GenerationState::Succeeded
        } else
        {   GenerationState::Failed
        };
        debug!("Generation state: Dispatching -> {:?}", self.state);
        Ok(self.state)
    }
}

/// Send a built prompt to the model with a client made for this call only.
///
/// Every failure comes back as `GenerationResult::Failure`; nothing is
/// retried.
pub async fn generate(
  spec: &PromptSpec
, credential: &Credential
, connector: &dyn Connector
) -> GenerationResult
{   debug!("Dispatching {} prompt", spec.content_type.id());
    let client = connector.connect(credential);
    let result: GenerationResult = client.generate(spec).await.into();
    match &result
    {   GenerationResult::Success { text } => {
          info!(
            "Generated {} ({} chars)",
            spec.content_type.id(), text.chars().count()
          );
        }
      , GenerationResult::Failure { message } => {
          error!("Generation of {} failed: {}", spec.content_type.id(), message);
        }
    }
    result
}

/// Validate, gate, build and dispatch one request.
///
/// The connector is never touched when validation or the credential
/// gate fails.
pub async fn generate_content(
  request: &ContentRequest
, credential: Option<&str>
, connector: &dyn Connector
) -> GenerationResult
{   let mut flow = GenerationFlow::new();
    let result = generate_tracked(request, credential, connector, &mut flow)
      .await;
    debug!(
      "{} request ended in {:?}",
      request.content_type().id(), flow.state()
    );
    result
}

/// `generate_content`, driving a caller-owned `GenerationFlow`.
///
/// Validation and credential failures leave the flow in `Idle`. A flow
/// that has already dispatched is rejected without touching the
/// connector.
pub async fn generate_tracked(
  request: &ContentRequest
, credential: Option<&str>
, connector: &dyn Connector
, flow: &mut GenerationFlow
) -> GenerationResult
{   if let Err(e) = request.validate()
    {   return e.into();
    }

    let credential = match ensure_credential(credential)
    {   Ok(c) => c
      , Err(e) => return e.into()
    };

    let spec = build_prompt(request);

    if let Err(e) = flow.begin_dispatch()
    {   error!("{}", e);
        return e.into();
    }
    let result = generate(&spec, &credential, connector).await;
    if let Err(e) = flow.finish(&result)
    {   error!("{}", e);
    }
    result
}
