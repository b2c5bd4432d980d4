//! Scripted transport shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use photo_search::client::Transport;
use photo_search::{ResultSet, SearchError, SearchRecord, SearchResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub enum Reply {
    Body(String),
    Fail(String),
    /// Answers only once the paired sender fires
    Gated(oneshot::Receiver<String>),
}

/// Transport answering by query term, recording every requested URL.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, term: &str, body: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(term.to_string(), Reply::Body(body.into()));
    }

    pub fn fail(&self, term: &str, reason: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(term.to_string(), Reply::Fail(reason.to_string()));
    }

    pub fn gate(&self, term: &str) -> oneshot::Sender<String> {
        let (tx, rx) = oneshot::channel();
        self.replies
            .lock()
            .unwrap()
            .insert(term.to_string(), Reply::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Encoded `q` values of every request so far
    pub fn terms(&self) -> Vec<String> {
        self.requests().iter().map(|url| query_term(url)).collect()
    }
}

pub fn query_term(url: &str) -> String {
    url.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix("q="))
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> SearchResult<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        let term = query_term(url);
        let reply = self.replies.lock().unwrap().remove(&term);

        match reply {
            Some(Reply::Body(body)) => Ok(body.into_bytes()),
            Some(Reply::Fail(reason)) => Err(SearchError::Transport(reason.into())),
            Some(Reply::Gated(rx)) => rx
                .await
                .map(String::into_bytes)
                .map_err(|e| SearchError::Transport(Box::new(e))),
            None => Ok(br#"{"hits":[]}"#.to_vec()),
        }
    }
}

pub fn hits(records: &[(u64, &str)]) -> String {
    let hits: Vec<String> = records
        .iter()
        .map(|(id, url)| format!(r#"{{"id":{},"webformatURL":"{}"}}"#, id, url))
        .collect();
    format!(r#"{{"total":{},"hits":[{}]}}"#, records.len(), hits.join(","))
}

pub fn result_set(records: &[(u64, &str)]) -> ResultSet {
    records
        .iter()
        .map(|(id, url)| SearchRecord::new(*id, *url))
        .collect()
}

/// Presenter that remembers every replacement it was given
pub fn recording_presenter() -> (
    impl FnMut(&[SearchRecord]) + Send + 'static,
    Arc<Mutex<Vec<ResultSet>>>,
) {
    let shown = Arc::new(Mutex::new(Vec::new()));
    let sink = shown.clone();
    let presenter = move |records: &[SearchRecord]| sink.lock().unwrap().push(records.to_vec());
    (presenter, shown)
}
