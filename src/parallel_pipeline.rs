// THEORY:
// `DetectorHandle` puts a `ForegroundDetector` behind an actor so async code can
// feed it. A single task owns the detector and drains a bounded channel of
// requests, answering each over its own oneshot. Because there is exactly one
// consumer reading a FIFO channel, frames are applied in the order they were
// submitted, which the model requires: frame N+1 is never applied before frame N.
//
// The per-frame work is CPU bound (and itself fans out over rayon), so it runs on
// tokio's blocking pool; the detector is moved there and handed back each frame.

use crate::config::DetectorConfig;
use crate::detector::{ForegroundDetector, ForegroundMask};
use crate::error::{DetectorError, Result};
use image::GrayImage;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info};

const REQUEST_QUEUE_DEPTH: usize = 8;

/// Message type for the detector actor
enum DetectorMessage {
    Frame(GrayImage, oneshot::Sender<Result<ForegroundMask>>),
    Shutdown,
}

/// Async front end for a detector running on its own task.
pub struct DetectorHandle {
    sender: mpsc::Sender<DetectorMessage>,
    worker: Option<JoinHandle<u64>>,
}

impl DetectorHandle {
    /// Validates the parameters and spawns the actor task. Must be called from
    /// within a tokio runtime.
    pub fn spawn(width: u32, height: u32, config: DetectorConfig) -> Result<Self> {
        let detector = ForegroundDetector::new(width, height, config)?;
        let (sender, mut receiver) = mpsc::channel::<DetectorMessage>(REQUEST_QUEUE_DEPTH);

        let worker = tokio::spawn(async move {
            let mut detector = Some(detector);
            let mut processed = 0u64;

            while let Some(message) = receiver.recv().await {
                match message {
                    DetectorMessage::Frame(frame, reply) => {
                        let Some(mut current) = detector.take() else {
                            break;
                        };
                        let outcome = tokio::task::spawn_blocking(move || {
                            let result = current.accept(&frame).map(|()| current.output().clone());
                            (current, result)
                        })
                        .await;

                        match outcome {
                            Ok((current, result)) => {
                                if result.is_ok() {
                                    processed += 1;
                                }
                                detector = Some(current);
                                let _ = reply.send(result);
                            }
                            Err(join_error) => {
                                error!(%join_error, "Detector worker panicked");
                                break;
                            }
                        }
                    }
                    DetectorMessage::Shutdown => break,
                }
            }

            info!(processed, "Detector service stopped");
            processed
        });

        info!(width, height, "Detector service started");
        Ok(Self {
            sender,
            worker: Some(worker),
        })
    }

    /// Submits a frame and waits for its mask.
    pub async fn process(&self, frame: GrayImage) -> Result<ForegroundMask> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(DetectorMessage::Frame(frame, reply))
            .await
            .map_err(|_| DetectorError::ServiceClosed)?;
        response.await.map_err(|_| DetectorError::ServiceClosed)?
    }

    /// Stops the actor and returns the number of frames it applied.
    pub async fn shutdown(mut self) -> Result<u64> {
        let _ = self.sender.send(DetectorMessage::Shutdown).await;
        match self.worker.take() {
            Some(worker) => Ok(worker.await?),
            None => Err(DetectorError::ServiceClosed),
        }
    }
}

impl Drop for DetectorHandle {
    fn drop(&mut self) {
        // Best effort shutdown on drop
        if self.worker.is_some() {
            let _ = self.sender.try_send(DetectorMessage::Shutdown);
        }
    }
}
