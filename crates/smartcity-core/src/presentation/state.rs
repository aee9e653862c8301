//! State container shared by the view-models.
//!
//! A single `watch` cell holds the current state; every update goes
//! through [`StateHandle::update_state`]. One-shot side effects
//! (navigation, error toasts) travel on a bounded `mpsc` queue that the
//! consumer takes once. Background work is spawned under a
//! [`CancellationToken`] that fires when the container is dropped.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Side-effect queue depth.
pub const EFFECT_CAPACITY: usize = 64;

/// Cloneable write access to a container's state and effect queue.
pub struct StateHandle<S, E> {
    state: Arc<watch::Sender<S>>,
    effects: mpsc::Sender<E>,
}

impl<S, E> Clone for StateHandle<S, E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            effects: self.effects.clone(),
        }
    }
}

impl<S: Clone, E> StateHandle<S, E> {
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    /// Mutate the state in place and notify subscribers.
    pub fn update_state(&self, f: impl FnOnce(&mut S)) {
        self.state.send_modify(f);
    }

    /// Queue a one-shot effect. Dropped (and logged) when nobody drains
    /// the queue and it is full.
    pub fn send_effect(&self, effect: E) {
        if let Err(e) = self.effects.try_send(effect) {
            debug!(error = %e, "side effect dropped");
        }
    }
}

/// Owner of a view-model's state, effect queue and background tasks.
pub struct StateContainer<S, E> {
    handle: StateHandle<S, E>,
    effects: Mutex<Option<mpsc::Receiver<E>>>,
    cancel: CancellationToken,
}

impl<S: Clone + Send + Sync + 'static, E: Send + 'static> StateContainer<S, E> {
    pub fn new(initial: S) -> Self {
        let (state, _) = watch::channel(initial);
        let (effects_tx, effects_rx) = mpsc::channel(EFFECT_CAPACITY);
        Self {
            handle: StateHandle {
                state: Arc::new(state),
                effects: effects_tx,
            },
            effects: Mutex::new(Some(effects_rx)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn handle(&self) -> StateHandle<S, E> {
        self.handle.clone()
    }

    pub fn state(&self) -> S {
        self.handle.state()
    }

    pub fn update_state(&self, f: impl FnOnce(&mut S)) {
        self.handle.update_state(f);
    }

    pub fn send_effect(&self, effect: E) {
        self.handle.send_effect(effect);
    }

    /// Watch for state changes.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.handle.state.subscribe()
    }

    /// The side-effect receiver. Only the first caller gets it.
    pub fn take_effects(&self) -> Option<mpsc::Receiver<E>> {
        self.effects.lock().ok()?.take()
    }

    /// Spawn work that stops when the container is dropped.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.cancel.child_token();
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = task => {}
            }
        })
    }
}

impl<S, E> Drop for StateContainer<S, E> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
