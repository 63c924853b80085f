//! Scripted in-memory transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures_util::future::{self, BoxFuture};
use futures_util::{stream, StreamExt};
use tokio::sync::mpsc;

use crate::error::RelayError;
use crate::session::ExecutionContext;
use crate::transport::{ByteStream, Transport};
use crate::Result;

/// Encode one outer record whose stdout carries a single inner output line.
pub fn inner_output(text: &str) -> Vec<u8> {
    let inner = serde_json::json!({ "output": text }).to_string();
    let outer = serde_json::json!({ "stdout": format!("{inner}\n") }).to_string();
    format!("{outer}\n").into_bytes()
}

/// Encode one outer record whose stdout carries a raw inner JSON line.
pub fn inner_line(json: serde_json::Value) -> Vec<u8> {
    let outer = serde_json::json!({ "stdout": format!("{json}\n") }).to_string();
    format!("{outer}\n").into_bytes()
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub action: String,
    pub body: String,
    pub context: ExecutionContext,
}

enum Scripted {
    Chunks(Vec<Vec<u8>>),
    Live(mpsc::UnboundedReceiver<Vec<u8>>),
    Status(u16, String),
    Unanswered,
}

#[derive(Default)]
struct State {
    responses: HashMap<String, VecDeque<Scripted>>,
    requests: Vec<RecordedRequest>,
}

/// Replays canned responses per action, in order, and records requests.
///
/// An action with nothing scripted answers with an empty body.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<State>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self, action: &str, response: Scripted) {
        self.state
            .lock()
            .unwrap()
            .responses
            .entry(action.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn respond(&self, action: &str, chunks: Vec<Vec<u8>>) {
        self.script(action, Scripted::Chunks(chunks));
    }

    pub fn fail(&self, action: &str, status: u16, body: &str) {
        self.script(action, Scripted::Status(status, body.to_string()));
    }

    /// Script a request that is recorded but never answered.
    pub fn never_answer(&self, action: &str) {
        self.script(action, Scripted::Unanswered);
    }

    /// Script a response whose chunks are fed by the returned sender.
    /// The body ends when the sender is dropped.
    pub fn respond_live(&self, action: &str) -> mpsc::UnboundedSender<Vec<u8>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.script(action, Scripted::Live(rx));
        tx
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.action).collect()
    }
}

impl Transport for ScriptedTransport {
    fn post<'a>(
        &'a self,
        context: &'a ExecutionContext,
        body: String,
    ) -> BoxFuture<'a, Result<ByteStream>> {
        Box::pin(async move {
            let action = serde_json::from_str::<Vec<serde_json::Value>>(&body)?
                .first()
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();

            let scripted = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(RecordedRequest {
                    action: action.clone(),
                    body,
                    context: context.clone(),
                });
                state
                    .responses
                    .get_mut(&action)
                    .and_then(VecDeque::pop_front)
            };

            match scripted {
                None => Ok(stream::empty().boxed()),
                Some(Scripted::Chunks(chunks)) => {
                    Ok(stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from(c)))).boxed())
                }
                Some(Scripted::Live(rx)) => Ok(stream::unfold(rx, |mut rx| async move {
                    rx.recv().await.map(|chunk| (Ok(Bytes::from(chunk)), rx))
                })
                .boxed()),
                Some(Scripted::Status(status, body)) => Err(RelayError::Status { status, body }),
                Some(Scripted::Unanswered) => future::pending().await,
            }
        })
    }
}
