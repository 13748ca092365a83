//! Stream resolution pipeline
//!
//! Each request spawns one Catalog Service lookup on the injected runtime and
//! tags it with a generation number. Results come back over a channel that the
//! engine drains from `tick`, so nothing is ever applied from inside the task.
//!
//! A new request cancels the previous task and bumps the generation. A result
//! that still slips through (already queued, or the task finished before it
//! observed cancellation) carries an old generation and is rejected by
//! [`StreamResolver::is_current`].

use std::fmt;
use std::sync::Arc;

use encore_core::{CatalogError, CatalogService, StreamRef, TrackId};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of one catalog lookup
#[derive(Debug)]
pub struct Resolution {
    /// Generation of the request that produced this result
    pub generation: u64,
    /// Track that was resolved
    pub track_id: TrackId,
    /// Catalog answer
    pub result: Result<StreamRef, CatalogError>,
}

/// Issues catalog lookups and collects their results
pub struct StreamResolver {
    catalog: Arc<dyn CatalogService>,
    runtime: Handle,
    generation: u64,
    pending: Option<(TrackId, CancellationToken)>,
    tx: UnboundedSender<Resolution>,
    rx: UnboundedReceiver<Resolution>,
}

impl fmt::Debug for StreamResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamResolver")
            .field("generation", &self.generation)
            .field("pending", &self.pending.as_ref().map(|(id, _)| id))
            .finish_non_exhaustive()
    }
}

impl StreamResolver {
    /// Create a resolver that spawns lookups on `runtime`
    pub fn new(catalog: Arc<dyn CatalogService>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            runtime,
            generation: 0,
            pending: None,
            tx,
            rx,
        }
    }

    /// Generation of the most recent request (or cancellation)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check if a lookup is in flight
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start resolving `track_id`, superseding any lookup in flight
    ///
    /// Returns the generation assigned to the new request.
    pub fn request(&mut self, track_id: TrackId) -> u64 {
        self.cancel();

        let generation = self.generation;
        let token = CancellationToken::new();
        self.pending = Some((track_id.clone(), token.clone()));

        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        let lookup = track_id.clone();

        debug!(track_id = %track_id, generation, "Resolving stream");

        self.runtime.spawn(async move {
            tokio::select! {
                biased;

                () = token.cancelled() => {
                    debug!(track_id = %track_id, generation, "Stream resolution cancelled");
                }
                result = catalog.resolve_stream(&lookup) => {
                    // Engine may already be gone; nothing left to deliver to
                    let _ = tx.send(Resolution {
                        generation,
                        track_id,
                        result,
                    });
                }
            }
        });

        generation
    }

    /// Cancel the lookup in flight and invalidate every result issued so far
    ///
    /// Returns true if a lookup was pending.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        match self.pending.take() {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Next delivered result, if any
    pub fn try_next(&mut self) -> Option<Resolution> {
        match self.rx.try_recv() {
            Ok(resolution) => Some(resolution),
            // The resolver owns a sender, so the channel never disconnects
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Whether `resolution` answers the request currently in flight
    pub fn is_current(&self, resolution: &Resolution) -> bool {
        resolution.generation == self.generation
            && self
                .pending
                .as_ref()
                .is_some_and(|(id, _)| *id == resolution.track_id)
    }

    /// Mark the request in flight as answered
    pub fn complete(&mut self) {
        self.pending = None;
    }
}
