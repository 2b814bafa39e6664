pub mod client;
pub mod worker;

pub use client::{ChatTransport, HttpTransport, TurnReply, TurnRequest};
pub use worker::{BackendCommand, BackendEvent, BackendHandle, BackendWorker};
