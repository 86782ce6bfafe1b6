use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use log::{debug, trace, error, info};

use crate::dispatch::generate_content;
use crate::error::Error;
use crate::providers::Connector;
use crate::request::{ContentRequest, GenerationResult};
use crate::SabiFoot;

/// A generation that has been handed to the backend
pub struct GenerationTicket
{   pub id: u64
  , pub reply: mpsc::UnboundedReceiver<crate::GenerateReply>
}

impl GenerationTicket
{   /// Wait for the single result of this generation
    pub async fn wait(mut self) -> GenerationResult
    {   match self.reply.recv().await
        {   Some(result) => result
          , None => {
              error!("Reply channel closed for generation {}", self.id);
              Error::Other("Backend disconnected".to_string()).into()
            }
        }
    }
}

struct Pending
{   handle: tokio::task::JoinHandle<()>
  , reply: crate::GenerateReplySender
}

/// Backend state: the connector and the generations still in flight
pub struct SabiBackendState
{   connector: Arc<dyn Connector>
  , pending: HashMap<u64, Pending>
  , done_tx: mpsc::UnboundedSender<(u64, GenerationResult)>
}

impl SabiBackendState
{   pub fn new(
      connector: Arc<dyn Connector>
    , done_tx: mpsc::UnboundedSender<(u64, GenerationResult)>
    ) -> Self
    {   debug!("Initializing SabiBackendState");
        SabiBackendState
        {   connector
          , pending: HashMap::new()
          , done_tx
        }
    }

    /// Spawn one independent generation task
    fn start(&mut self, cmd: crate::GenerateArgs)
    {   let crate::GenerateArgs { id, request, credential, reply } = cmd;
        let connector = Arc::clone(&self.connector);
        let done_tx = self.done_tx.clone();
        let handle = tokio::spawn(async move {
          let result = generate_content(
            &request,
            credential.as_deref(),
            connector.as_ref()
          ).await;
          let _ = done_tx.send((id, result));
        });
        self.pending.insert(id, Pending { handle, reply });
    }

    /// Forward a finished result unless the generation was cancelled
    fn complete(&mut self, id: u64, result: GenerationResult)
    {   match self.pending.remove(&id)
        {   Some(pending) => {
              let _ = pending.reply.send(result);
            }
          , None => {
              trace!("Dropping result for cancelled generation {}", id);
            }
        }
    }

    fn cancel(&mut self, id: u64) -> bool
    {   match self.pending.remove(&id)
        {   Some(pending) => {
              pending.handle.abort();
              let _ = pending.reply.send(Error::Cancelled.into());
              true
            }
          , None => false
        }
    }

    fn cancel_all(&mut self)
    {   let ids: Vec<u64> = self.pending.keys().copied().collect();
        for id in ids
        {   self.cancel(id);
        }
    }
}

/// Public API for the generation backend - owns the task
pub struct SabiBackend
{   hand: crate::SabiHand
  , next_id: AtomicU64
  , _task_handle: tokio::task::JoinHandle<()>
}

impl SabiBackend
{   /// Create and spawn a new backend
    /// Returns immediately - spawns background task
    pub fn new(connector: Arc<dyn Connector>) -> Self
    {   debug!("Creating SabiBackend with task ownership");

        let (generate_tx, generate_rx)
          = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx)
          = mpsc::unbounded_channel();
        let (kill_process_tx, kill_process_rx)
          = mpsc::unbounded_channel();

        let hand = crate::SabiHand
        {   generate_tx
          , cancel_tx
          , kill_process_tx
        };

        let foot = crate::SabiFoot
        {   generate_rx
          , cancel_rx
          , kill_process_rx
        };

        let _task_handle = tokio::spawn(async move {
          run_backend_loop(foot, connector).await
        });

        SabiBackend
        {   hand
          , next_id: AtomicU64::new(1)
          , _task_handle
        }
    }

    /// Backend talking to Gemini with the given model settings
    pub fn gemini(config: crate::config::ModelConfig) -> Self
    {   SabiBackend::new(Arc::new(
          crate::providers::GeminiConnector::new(config)
        ))
    }

    /// Queue a generation - returns almost immediately
    pub fn generate(
      &self
    , request: ContentRequest
    , credential: Option<String>
    ) -> Result<GenerationTicket, Error>
    {   let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(
          "generate queuing {} request as {}",
          request.content_type().id(), id
        );
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::GenerateArgs
        {   id
          , request
          , credential
          , reply: reply_tx
        };

        self.hand.generate_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            Error::Other("Backend disconnected".to_string())
          })?;

        Ok(GenerationTicket { id, reply: reply_rx })
    }

    /// Cancel a pending generation; resolves to whether it was pending
    pub async fn cancel(&self, id: u64) -> Result<bool, Error>
    {   debug!("cancel queuing for generation {}", id);
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        self.hand.cancel_tx
          .send(crate::CancelArgs { id, reply: reply_tx })
          .map_err(|_| {
            error!("Backend channel closed");
            Error::Other("Backend disconnected".to_string())
          })?;

        reply_rx.recv().await
          .unwrap_or_else(|| {
            Err(Error::Other("Backend disconnected".to_string()))
          })
    }

    /// Gracefully shutdown the backend, cancelling pending work
    pub async fn shutdown(self)
      -> Result<(), Error>
    {   debug!("Shutting down SabiBackend");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::KillProcessArgs
        {   reply: reply_tx
        };

        self.hand.kill_process_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel already closed");
            Error::Other("Backend already shutdown".to_string())
          })?;

        // Wait for shutdown confirmation
        if let Some(result) = reply_rx.recv().await
        {   debug!("Backend shutdown confirmed");
            result
        } else
        {   error!("Backend stopped without confirming shutdown");
            Err(Error::Other("Backend disconnected".to_string()))
        }
    }
}

/// Main backend event loop
///
/// The select only routes commands. Generations run in their own
/// tasks and report back through `done_rx`. Arms are polled in order so
/// a generation is always registered before a cancel sent after it.
/// The loop ends on KillProcess, or once every command sender is gone;
/// either way nothing is left running.
async fn run_backend_loop(
  foot: crate::SabiFoot
, connector: Arc<dyn Connector>
)
{   debug!("Starting SabiBackend event loop");
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let mut state = SabiBackendState::new(connector, done_tx);
    let SabiFoot
    {   mut generate_rx
      , mut cancel_rx
      , mut kill_process_rx
    } = foot;
    let mut generate_open = true;
    let mut cancel_open = true;
    let mut kill_open = true;

    while generate_open || cancel_open || kill_open
    { tokio::select!
      { biased;
        cmd = generate_rx.recv(), if generate_open => match cmd
        {   Some(cmd) => {
              debug!("Received Generate {}", cmd.id);
              state.start(cmd);
            }
          , None => generate_open = false
        }
      , Some((id, result)) = done_rx.recv() => {
          debug!("Generation {} finished", id);
          state.complete(id, result);
        }
      , cmd = cancel_rx.recv(), if cancel_open => match cmd
        {   Some(cmd) => {
              debug!("Received Cancel {}", cmd.id);
              let _ = cmd.reply.send(Ok(state.cancel(cmd.id)));
            }
          , None => cancel_open = false
        }
      , cmd = kill_process_rx.recv(), if kill_open => match cmd
        {   Some(cmd) => {
              debug!("Received KillProcess");
              state.cancel_all();
              let _ = cmd.reply.send(Ok(()));
              info!("SabiBackend shutting down");
              return;
            }
          , None => kill_open = false
        }
      }
    }

    info!("SabiBackend dropped, cancelling pending generations");
    state.cancel_all();
}

#[cfg(test)]
mod tests
{   use super::*;
    use async_trait::async_trait;
    use crate::providers::ModelClient;
    use crate::request::{ContentFields, Credential, PromptSpec};
    use crate::schema::Tone;

    struct SlowClient;

    #[async_trait]
    impl ModelClient for SlowClient
    {   async fn generate(&self, _spec: &PromptSpec) -> Result<String, Error>
        {   tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            Ok("too late".to_string())
        }
    }

    struct SlowConnector;

    impl Connector for SlowConnector
    {   fn connect(&self, _credential: &Credential) -> Box<dyn ModelClient>
        {   Box::new(SlowClient)
        }
    }

    fn tagline() -> ContentRequest
    {   ContentRequest::new(
          ContentFields::Tagline
          {   business_description: "Affordable solar panels for homes".to_string()
          }
        , Tone::Inspirational
        , true
        )
    }

    #[tokio::test]
    async fn cancel_resolves_as_failure()
    {   let backend = SabiBackend::new(Arc::new(SlowConnector));
        let ticket = backend
          .generate(tagline(), Some("key".to_string()))
          .unwrap();
        let id = ticket.id;
        assert_eq!(backend.cancel(id).await, Ok(true));
        assert_eq!(
          ticket.wait().await,
          GenerationResult::Failure { message: "Generation was cancelled.".to_string() }
        );
        assert_eq!(backend.cancel(id).await, Ok(false));
        assert_eq!(backend.shutdown().await, Ok(()));
    }

    #[tokio::test]
    async fn dropping_backend_cancels_pending()
    {   let connector: Arc<dyn Connector> = Arc::new(SlowConnector);
        let backend = SabiBackend::new(Arc::clone(&connector));
        let ticket = backend
          .generate(tagline(), Some("key".to_string()))
          .unwrap();
        drop(backend);

        let result = tokio::time::timeout(
          std::time::Duration::from_secs(5),
          ticket.wait()
        ).await.unwrap();
        assert_eq!(result.message(), Some("Generation was cancelled."));

        // The loop and the aborted task both release the connector.
        for _ in 0..100
        {   if Arc::strong_count(&connector) == 1 { break; }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(Arc::strong_count(&connector), 1);
    }

    #[tokio::test]
    async fn shutdown_cancels_pending()
    {   let backend = SabiBackend::new(Arc::new(SlowConnector));
        let ticket = backend
          .generate(tagline(), Some("key".to_string()))
          .unwrap();
        assert_eq!(backend.shutdown().await, Ok(()));
        assert_eq!(ticket.wait().await.message(), Some("Generation was cancelled."));
    }
}
