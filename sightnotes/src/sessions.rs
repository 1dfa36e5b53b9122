//! Background worker that performs session-browser effects.
//!
//! The view coordinator only decides *what* to fetch. Effects are sent to this
//! worker over a channel; each one runs in its own task so a slow listing never
//! delays a load, and results come back as `AppEvent`s tagged with the
//! request id they answer.

use sightnotes_core::store::SessionStore;
use sightnotes_core::view::Effect;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::event::AppEvent;

/// Spawns the worker loop. It ends when every effect sender is dropped.
pub fn spawn_session_worker(
    store: SessionStore,
    mut rx: UnboundedReceiver<Effect>,
    event_tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(effect) = rx.recv().await {
            let store = store.clone();
            let event_tx = event_tx.clone();
            tokio::spawn(async move {
                let _ = event_tx.send(run_effect(&store, effect).await);
            });
        }
    })
}

async fn run_effect(store: &SessionStore, effect: Effect) -> AppEvent {
    match effect {
        Effect::ListSessions(request) => {
            AppEvent::SessionsLoaded { request, sessions: store.list_sessions().await }
        }
        Effect::LoadSession { request, filename } => AppEvent::SessionLoaded {
            request,
            detail: store.load_session(&filename).await.map(Box::new),
        },
    }
}
