pub mod error;
pub mod config;
pub mod schema;
pub mod request;
pub mod prompt;
pub mod providers;
pub mod dispatch;
pub mod history;
pub mod client;

pub use client::{GenerationTicket, SabiBackend};
pub use config::{ModelConfig, Settings};
pub use dispatch::{
  ensure_credential, generate, generate_content, generate_tracked
};
pub use error::{Error, ErrorKind};
pub use history::{HistoryItem, HistoryLog};
pub use prompt::build_prompt;
pub use request::{
  ContentFields, ContentRequest, Credential, GenerationResult, PromptSpec
};
pub use schema::{get_schema, ContentType, Tone};

/*

sabiwriter turns short business descriptions into marketing copy:
social bios, taglines, product descriptions and posts. Every
generator runs the same pipeline and differs only in wording.

  ContentRequest
    -> validate()            (schema.rs min lengths)
    -> ensure_credential()   (dispatch.rs, no I/O)
    -> build_prompt()        (prompt.rs, pure)
    -> generate()            (dispatch.rs, one client per call)
    -> GenerationResult      (Success{text} | Failure{message})

sabiwriter/
├── src/
│   ├── lib.rs          # Re-exports and the backend interface
│   ├── error.rs        # Error type and taxonomy
│   ├── config.rs       # Model endpoint and caller settings
│   ├── schema.rs       # Content types, tones, field constraints
│   ├── request.rs      # Requests, prompt specs, results, credentials
│   ├── prompt.rs       # Shared prompt template + per-type profiles
│   ├── providers/      # Model clients (Gemini)
│   ├── dispatch.rs     # Credential gate, dispatch, state machine
│   ├── history.rs      # History records
│   └── client.rs       # Channel-driven backend with cancellation
└── tests/

*/

/// Initialise `env_logger` once; later calls are ignored.
pub fn init_logging()
{   let _ = env_logger::try_init();
}

// SABIWRITER BACKEND INTERFACE:

// ===== Generate =====

pub type GenerateReply = GenerationResult;
pub type GenerateReplySender
  = tokio::sync::mpsc::UnboundedSender<GenerateReply>;

pub struct GenerateArgs
{   pub id: u64
  , pub request: ContentRequest
  , /// Resolved by the caller; checked before any dispatch
    pub credential: Option<String>
  , pub reply: GenerateReplySender
}

// ===== Cancel =====

pub type CancelReply = Result<bool, crate::error::Error>;
pub type CancelReplySender
  = tokio::sync::mpsc::UnboundedSender<CancelReply>;

pub struct CancelArgs
{   pub id: u64
  , pub reply: CancelReplySender
}

// ===== KillProcess =====

pub type KillProcessReply = Result<(), crate::error::Error>;
pub type KillProcessReplySender
  = tokio::sync::mpsc::UnboundedSender<KillProcessReply>;

pub struct KillProcessArgs
{   pub reply: KillProcessReplySender
}

// ===== SabiHand (sender side) =====

pub struct SabiHand
{   pub generate_tx
      : tokio::sync::mpsc::UnboundedSender<GenerateArgs>
  , pub cancel_tx
      : tokio::sync::mpsc::UnboundedSender<CancelArgs>
  , pub kill_process_tx
      : tokio::sync::mpsc::UnboundedSender<KillProcessArgs>
}

// ===== SabiFoot (receiver side) =====

pub struct SabiFoot
{   pub generate_rx
      : tokio::sync::mpsc::UnboundedReceiver<GenerateArgs>
  , pub cancel_rx
      : tokio::sync::mpsc::UnboundedReceiver<CancelArgs>
  , pub kill_process_rx
      : tokio::sync::mpsc::UnboundedReceiver<KillProcessArgs>
}
