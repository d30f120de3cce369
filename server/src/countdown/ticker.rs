use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::Stream;
use tracing::{debug, warn};

use super::{parse_instant, Clock, Countdown};

pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// Recomputes a countdown on a fixed period and publishes each result as one
/// frame.
pub struct CountdownTicker;

impl CountdownTicker {
    /// Starts a ticker for a raw timestamp. An unparseable target publishes
    /// [`Countdown::invalid`] frames.
    pub fn start(target: &str, clock: Arc<dyn Clock>, period: Duration) -> TickerHandle {
        Self::spawn(parse_instant(target), clock, period)
    }

    pub fn start_at(
        target: DateTime<Utc>,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> TickerHandle {
        Self::spawn(Some(target), clock, period)
    }

    fn spawn(
        target: Option<DateTime<Utc>>,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> TickerHandle {
        let frame_at = move |now: DateTime<Utc>| match target {
            Some(target) => Countdown::between(target, now),
            None => Countdown::invalid(),
        };

        let first = frame_at(clock.now());
        let (frames_tx, _) = watch::channel(first);
        let frames = Arc::new(frames_tx);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let publisher = frames.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; that frame was already published.
            interval.tick().await;

            let mut running = first.is_running();
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        debug!("Countdown ticker stopped");
                        break;
                    }
                    _ = publisher.closed() => {
                        debug!("Countdown ticker has no displays left");
                        break;
                    }
                    _ = interval.tick() => {
                        let frame = frame_at(clock.now());
                        if frame.is_running() != running {
                            running = frame.is_running();
                            debug!(status = ?frame.status, "Countdown state changed");
                        }
                        publisher.send_replace(frame);
                    }
                }
            }
        });

        TickerHandle {
            frames,
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

/// Owner of a running ticker. Dropping it aborts the ticker task.
///
/// The ticker only runs while some subscriber is alive: once every receiver
/// from [`TickerHandle::subscribe`] is gone the task ends, and
/// [`TickerHandle::current`] keeps the last published frame.
pub struct TickerHandle {
    frames: Arc<watch::Sender<Countdown>>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// The most recently published frame.
    pub fn current(&self) -> Countdown {
        *self.frames.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Countdown> {
        self.frames.subscribe()
    }

    /// Stops the ticker. No frame is published after this returns.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Countdown ticker ended abnormally");
            }
        }
    }

    /// Turns the handle into a stream of frames, starting with the current
    /// one. The ticker runs until the stream is dropped.
    pub fn into_stream(self) -> FrameStream {
        FrameStream {
            frames: WatchStream::new(self.subscribe()),
            _handle: self,
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

pub struct FrameStream {
    frames: WatchStream<Countdown>,
    _handle: TickerHandle,
}

impl Stream for FrameStream {
    type Item = Countdown;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.frames).poll_next(cx)
    }
}
