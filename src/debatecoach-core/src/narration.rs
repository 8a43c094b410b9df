//! Background narration of AI turns.
//!
//! The controller hands each AI turn to a [`NarrationQueue`] and moves on;
//! a worker task synthesizes clips in order and publishes them on a channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::collaborator::Narrator;
use crate::error::CollaboratorError;

/// Audio (or the synthesis failure) for one AI turn.
#[derive(Debug)]
pub struct NarratedTurn {
    pub round: u32,
    pub audio: Result<Vec<u8>, CollaboratorError>,
}

struct NarrationRequest {
    round: u32,
    text: String,
}

/// Sending half of the narration worker.
#[derive(Clone)]
pub struct NarrationQueue {
    tx: mpsc::UnboundedSender<NarrationRequest>,
}

impl NarrationQueue {
    /// Spawn the worker on the current tokio runtime. The worker exits once
    /// every queue handle is dropped and pending requests are drained.
    pub fn spawn(narrator: Arc<dyn Narrator>) -> (Self, mpsc::UnboundedReceiver<NarratedTurn>) {
        let (tx, mut requests) = mpsc::unbounded_channel::<NarrationRequest>();
        let (clips_tx, clips_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(request) = requests.recv().await {
                debug!(round = request.round, "Synthesizing narration");
                let audio = narrator.synthesize(&request.text).await;
                if let Err(e) = &audio {
                    warn!(round = request.round, error = %e, "Narration failed");
                }
                let clip = NarratedTurn {
                    round: request.round,
                    audio,
                };
                if clips_tx.send(clip).is_err() {
                    debug!("Narration receiver dropped, discarding clip");
                }
            }
        });

        (Self { tx }, clips_rx)
    }

    /// Queue `text` for narration without waiting for synthesis.
    pub(crate) fn enqueue(&self, round: u32, text: &str) {
        let request = NarrationRequest {
            round,
            text: text.to_string(),
        };
        if self.tx.send(request).is_err() {
            warn!(round, "Narration worker has stopped; turn not narrated");
        }
    }
}
