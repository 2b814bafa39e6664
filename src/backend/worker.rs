//! Backend worker
//!
//! Runs turn round trips off the UI thread. One command per user turn, one
//! reply or failure event back; the UI polls the event channel each frame.

use super::client::{ChatTransport, TurnReply, TurnRequest};
use crate::{ParleyError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Command sent to the backend worker
#[derive(Clone, Debug)]
pub enum BackendCommand {
    /// Complete one turn round trip
    Send {
        request: TurnRequest,
        request_id: Uuid,
    },

    /// Shutdown the worker
    Shutdown,
}

/// Event emitted by the backend worker
#[derive(Clone, Debug)]
pub enum BackendEvent {
    /// The backend replied
    Reply { request_id: Uuid, reply: TurnReply },

    /// The turn failed (timeout or transport error); no retry was made
    Failed {
        request_id: Uuid,
        error: ParleyError,
    },

    /// Worker has shut down
    Shutdown,
}

/// Handle for submitting turns from the UI
#[derive(Clone)]
pub struct BackendHandle {
    command_tx: Sender<BackendCommand>,
    event_rx: Receiver<BackendEvent>,
}

impl BackendHandle {
    /// Queue a turn; returns the id used to correlate the outcome
    pub fn send_turn(&self, request: TurnRequest) -> Result<Uuid> {
        let request_id = Uuid::new_v4();
        self.command_tx
            .send(BackendCommand::Send {
                request,
                request_id,
            })
            .map_err(|e| ParleyError::ChannelError(format!("Failed to send turn: {}", e)))?;
        Ok(request_id)
    }

    /// Try to receive an outcome (non-blocking)
    pub fn try_recv_event(&self) -> Option<BackendEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Request shutdown
    pub fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(BackendCommand::Shutdown)
            .map_err(|e| ParleyError::ChannelError(format!("Failed to send shutdown: {}", e)))
    }
}

/// Worker side of the backend client
pub struct BackendWorker {
    command_rx: Receiver<BackendCommand>,
    event_tx: Sender<BackendEvent>,
    transport: Box<dyn ChatTransport>,
}

impl BackendWorker {
    /// Create the worker around a transport
    pub fn new(transport: Box<dyn ChatTransport>) -> (BackendHandle, Self) {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        let handle = BackendHandle {
            command_tx,
            event_rx,
        };

        let worker = Self {
            command_rx,
            event_tx,
            transport,
        };

        (handle, worker)
    }

    /// Start the worker thread
    pub fn start_worker(self) -> JoinHandle<()> {
        thread::spawn(move || {
            info!("Backend worker started");

            while let Ok(command) = self.command_rx.recv() {
                match command {
                    BackendCommand::Send {
                        request,
                        request_id,
                    } => {
                        debug!("Sending turn {} for chat {}", request_id, request.chat_id);
                        let event = match self.transport.send_turn(&request) {
                            Ok(reply) => BackendEvent::Reply { request_id, reply },
                            Err(error) => {
                                warn!("Turn {} failed: {}", request_id, error);
                                BackendEvent::Failed { request_id, error }
                            }
                        };
                        let _ = self.event_tx.send(event);
                    }
                    BackendCommand::Shutdown => break,
                }
            }

            let _ = self.event_tx.send(BackendEvent::Shutdown);
            info!("Backend worker stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Transport fake returning a scripted outcome and counting attempts
    struct ScriptedTransport {
        reply: Result<TurnReply>,
        calls: Arc<Mutex<usize>>,
    }

    impl ChatTransport for ScriptedTransport {
        fn send_turn(&self, _request: &TurnRequest) -> Result<TurnReply> {
            *self.calls.lock() += 1;
            self.reply.clone()
        }
    }

    fn request() -> TurnRequest {
        TurnRequest {
            role: String::new(),
            user_text: "hello".to_string(),
            image_text: String::new(),
            chat_id: "c1".to_string(),
        }
    }

    #[test]
    fn test_reply_round_trip() {
        let calls = Arc::new(Mutex::new(0));
        let transport = ScriptedTransport {
            reply: Ok(TurnReply {
                chat_id: serde_json::json!("c1"),
                message: "hi!".to_string(),
            }),
            calls: Arc::clone(&calls),
        };
        let (handle, worker) = BackendWorker::new(Box::new(transport));
        let join = worker.start_worker();

        let id = handle.send_turn(request()).unwrap();
        handle.shutdown().unwrap();
        join.join().unwrap();

        match handle.try_recv_event().unwrap() {
            BackendEvent::Reply { request_id, reply } => {
                assert_eq!(request_id, id);
                assert_eq!(reply.message, "hi!");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn test_failure_is_single_attempt() {
        let calls = Arc::new(Mutex::new(0));
        let transport = ScriptedTransport {
            reply: Err(ParleyError::BackendTimeout),
            calls: Arc::clone(&calls),
        };
        let (handle, worker) = BackendWorker::new(Box::new(transport));
        let join = worker.start_worker();

        let id = handle.send_turn(request()).unwrap();
        handle.shutdown().unwrap();
        join.join().unwrap();

        match handle.try_recv_event().unwrap() {
            BackendEvent::Failed { request_id, error } => {
                assert_eq!(request_id, id);
                assert!(matches!(error, ParleyError::BackendTimeout));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(*calls.lock(), 1);
    }
}
