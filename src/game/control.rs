use super::player::PlayerId;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// The supervisor's handle on a running [RoundEngine](super::RoundEngine).
#[derive(Clone, Debug)]
pub struct EngineControl {
    cancel: Arc<watch::Sender<bool>>,
    departures: mpsc::UnboundedSender<PlayerId>,
}

/// The engine's end of an [EngineControl].
#[derive(Debug)]
pub struct EngineSignals {
    pub(crate) cancel: CancelToken,
    pub(crate) departures: mpsc::UnboundedReceiver<PlayerId>,
}

#[derive(Debug)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

pub fn channel() -> (EngineControl, EngineSignals) {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let (departures_tx, departures_rx) = mpsc::unbounded_channel();
    let control = EngineControl {
        cancel: Arc::new(cancel_tx),
        departures: departures_tx,
    };
    let signals = EngineSignals {
        cancel: CancelToken { rx: cancel_rx },
        departures: departures_rx,
    };
    (control, signals)
}

impl EngineControl {
    /// Stops the run at its next suspension point.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Tells the engine a player has left the session.
    /// Returns `false` if the engine is no longer running.
    pub fn player_left(&self, player: PlayerId) -> bool {
        self.departures.send(player).is_ok()
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested. Never resolves if the control was dropped first.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
