//! Scripted collaborators and a recording observer for controller tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use jobtrack_core::job::{
    ExistingJob, JobObserver, JobSubmitter, PollResponse, RemoteStatus, StatusEndpoint,
    StatusSnapshot,
};
use jobtrack_core::retry::TransportError;

pub type Reply = Result<PollResponse<Value>, TransportError>;

pub fn processing(progress: f64) -> Reply {
    Ok(PollResponse::Ok(
        StatusSnapshot::new(RemoteStatus::Processing).with_progress(progress),
    ))
}

pub fn pending() -> Reply {
    Ok(PollResponse::Ok(StatusSnapshot::new(RemoteStatus::Pending)))
}

pub fn completed(result: Value) -> Reply {
    Ok(PollResponse::Ok(
        StatusSnapshot::new(RemoteStatus::Completed)
            .with_progress(100.0)
            .with_result(result),
    ))
}

pub fn remote_failed(error: Option<&str>) -> Reply {
    let snapshot = StatusSnapshot::new(RemoteStatus::Failed);
    Ok(PollResponse::Ok(match error {
        Some(e) => snapshot.with_error(e),
        None => snapshot,
    }))
}

pub fn http_failure(status: u16, error: Option<&str>, retry_after: Option<&str>) -> Reply {
    Ok(PollResponse::Failed {
        status,
        error: error.map(str::to_string),
        retry_after: retry_after.map(str::to_string),
    })
}

pub fn accepted(job_id: &str) -> Arc<dyn JobSubmitter> {
    Arc::new(ExistingJob(job_id.to_string()))
}

/// Serves replies in order; the last one repeats.
pub struct ScriptedEndpoint {
    script: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl ScriptedEndpoint {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        assert!(!replies.is_empty(), "script needs at least one reply");
        Arc::new(Self {
            script: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusEndpoint<Value> for ScriptedEndpoint {
    async fn fetch(&self, url: &str) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

/// Blocks requests whose URL contains `blocked` until `gate` is notified.
pub struct GatedEndpoint {
    pub entered: Notify,
    pub gate: Notify,
    blocked: String,
    blocked_reply: Reply,
    other_reply: Reply,
    calls: AtomicUsize,
}

impl GatedEndpoint {
    pub fn new(blocked: &str, blocked_reply: Reply, other_reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            gate: Notify::new(),
            blocked: blocked.to_string(),
            blocked_reply,
            other_reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusEndpoint<Value> for GatedEndpoint {
    async fn fetch(&self, url: &str) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains(&self.blocked) {
            self.entered.notify_one();
            self.gate.notified().await;
            return self.blocked_reply.clone();
        }
        self.other_reply.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Progress(u8, Option<String>),
    Complete(Option<Value>),
    Error(String),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

impl JobObserver<Value> for RecordingObserver {
    fn on_progress(&self, progress: u8, message: Option<&str>) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Progress(progress, message.map(str::to_string)));
    }

    fn on_complete(&self, result: Option<&Value>) {
        self.events.lock().unwrap().push(Event::Complete(result.cloned()));
    }

    fn on_error(&self, message: &str) {
        self.events.lock().unwrap().push(Event::Error(message.to_string()));
    }
}
