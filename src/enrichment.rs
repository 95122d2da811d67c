//! Optional compound names and descriptions from an external source.
//!
//! The chemistry engine never waits on a lookup. It records which formulas
//! it would like to know about as [`LookupRequested`] messages; whatever
//! performs the lookup posts a [`LookupCompleted`] back through the
//! cache's channel, and completions are merged at the start of the next
//! resolution pass. Until then a formula simply has no enrichment.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Externally supplied naming data for one formula.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("lookup for '{formula}' failed: {reason}")]
    Failed { formula: String, reason: String },

    #[error("enrichment worker is not running")]
    Unavailable,

    #[error("malformed enrichment payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    /// Requested, no answer yet.
    Pending,
    Found(Enrichment),
    /// The lookup failed or found nothing; it is not retried.
    Absent,
}

/// Ask for enrichment data for `formula`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequested {
    pub formula: String,
}

/// Answer to a [`LookupRequested`]. `Ok(None)` means the source has no
/// entry for the formula.
#[derive(Debug)]
pub struct LookupCompleted {
    pub formula: String,
    pub result: Result<Option<Enrichment>, EnrichmentError>,
}

/// A synchronous lookup backend. Runs off the resolution thread, see
/// [`ThreadedDispatcher`].
pub trait EnrichmentProvider: Send {
    fn lookup(&mut self, formula: &str) -> Result<Option<Enrichment>, EnrichmentError>;
}

impl<F> EnrichmentProvider for F
where
    F: FnMut(&str) -> Result<Option<Enrichment>, EnrichmentError> + Send,
{
    fn lookup(&mut self, formula: &str) -> Result<Option<Enrichment>, EnrichmentError> {
        self(formula)
    }
}

/// Formula-keyed memo of lookups. At most one request is ever issued per
/// key.
#[derive(Debug)]
pub struct EnrichmentCache {
    entries: HashMap<String, CacheEntry>,
    outbox: Vec<LookupRequested>,
    completions_tx: Sender<LookupCompleted>,
    completions_rx: Receiver<LookupCompleted>,
}

impl Default for EnrichmentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrichmentCache {
    pub fn new() -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();
        Self {
            entries: HashMap::new(),
            outbox: Vec::new(),
            completions_tx,
            completions_rx,
        }
    }

    /// Channel end on which lookup results are delivered.
    pub fn completion_sender(&self) -> Sender<LookupCompleted> {
        self.completions_tx.clone()
    }

    pub fn entry(&self, formula: &str) -> Option<&CacheEntry> {
        self.entries.get(formula)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold every completion received so far into the cache. Failures are
    /// stored as [`CacheEntry::Absent`]. Returns the number merged.
    pub fn merge_completed(&mut self) -> usize {
        let mut merged = 0;
        while let Ok(done) = self.completions_rx.try_recv() {
            let entry = match done.result {
                Ok(Some(found)) => CacheEntry::Found(found),
                Ok(None) => CacheEntry::Absent,
                Err(e) => {
                    log::warn!("enrichment for {} unavailable: {}", done.formula, e);
                    CacheEntry::Absent
                }
            };
            self.entries.insert(done.formula, entry);
            merged += 1;
        }
        merged
    }

    /// Queue a lookup for `formula` unless one was already made.
    pub fn request(&mut self, formula: &str) -> bool {
        if formula.is_empty() || self.entries.contains_key(formula) {
            return false;
        }
        self.entries.insert(formula.to_string(), CacheEntry::Pending);
        self.outbox.push(LookupRequested {
            formula: formula.to_string(),
        });
        true
    }

    /// Enrichment for a species known by its display formula and its Hill
    /// formula.
    ///
    /// The display formula is looked up first. The Hill formula is only
    /// requested once the display formula is known to be absent. Missing
    /// keys are queued as a side effect.
    pub fn resolve(&mut self, display: &str, hill: &str) -> Option<Enrichment> {
        match self.entries.get(display) {
            Some(CacheEntry::Found(e)) => return Some(e.clone()),
            Some(CacheEntry::Pending) => return None,
            Some(CacheEntry::Absent) => {}
            None => {
                self.request(display);
                return None;
            }
        }
        if hill == display {
            return None;
        }
        match self.entries.get(hill) {
            Some(CacheEntry::Found(e)) => Some(e.clone()),
            Some(_) => None,
            None => {
                self.request(hill);
                None
            }
        }
    }

    /// Drain the queued lookup requests.
    pub fn take_requests(&mut self) -> Vec<LookupRequested> {
        std::mem::take(&mut self.outbox)
    }
}

/// Runs an [`EnrichmentProvider`] on a worker thread.
///
/// Requests go in through [`dispatch`](Self::dispatch); completions come
/// out on the sender given to [`spawn`](Self::spawn), normally
/// [`EnrichmentCache::completion_sender`]. Dropping the dispatcher closes
/// the request channel and joins the worker.
pub struct ThreadedDispatcher {
    requests: Option<Sender<LookupRequested>>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadedDispatcher {
    pub fn spawn<P>(mut provider: P, completions: Sender<LookupCompleted>) -> Self
    where
        P: EnrichmentProvider + 'static,
    {
        let (tx, rx) = mpsc::channel::<LookupRequested>();
        let worker = thread::spawn(move || {
            for request in rx {
                let result = provider.lookup(&request.formula);
                let done = LookupCompleted {
                    formula: request.formula,
                    result,
                };
                if completions.send(done).is_err() {
                    log::debug!("enrichment cache dropped, stopping worker");
                    break;
                }
            }
        });
        Self {
            requests: Some(tx),
            worker: Some(worker),
        }
    }

    pub fn dispatch<I>(&self, requests: I) -> Result<usize, EnrichmentError>
    where
        I: IntoIterator<Item = LookupRequested>,
    {
        let tx = self.requests.as_ref().ok_or(EnrichmentError::Unavailable)?;
        let mut sent = 0;
        for request in requests {
            tx.send(request).map_err(|_| EnrichmentError::Unavailable)?;
            sent += 1;
        }
        Ok(sent)
    }
}

impl Drop for ThreadedDispatcher {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("enrichment worker panicked");
            }
        }
    }
}
