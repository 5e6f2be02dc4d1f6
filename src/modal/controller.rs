use super::{ModalError, ModalOutcome, Pending, Shared, Validatable};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Imperative half of a modal bridge.
pub struct ModalController<P, V> {
    shared: Arc<Shared<P, V>>,
}

impl<P, V> Clone for ModalController<P, V> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<P, V: Send> ModalController<P, V> {
    pub(super) fn new(shared: Arc<Shared<P, V>>) -> Self {
        Self { shared }
    }

    #[cfg(test)]
    pub(super) fn shared(&self) -> &Shared<P, V> {
        &self.shared
    }

    /// Show the modal and wait for the user. Confirmation settles with
    /// `Confirmed(None)`.
    pub fn open(&self) -> OpenModal<V> {
        self.begin(None)
    }

    /// Show the modal; confirmation first validates `form` and only settles
    /// with `Confirmed(Some(values))` once validation passes.
    pub fn open_with(&self, form: Arc<dyn Validatable<Values = V>>) -> OpenModal<V> {
        self.begin(Some(form))
    }

    fn begin(&self, validatable: Option<Arc<dyn Validatable<Values = V>>>) -> OpenModal<V> {
        let (tx, rx) = oneshot::channel();
        let superseded = {
            let mut slot = self.shared.lock();
            slot.generation += 1;
            let generation = slot.generation;
            self.shared.set_visible(true);
            slot.pending.replace(Pending {
                tx,
                validatable,
                generation,
            })
        };
        if let Some(previous) = superseded {
            tracing::debug!(target: "console_core::modal", mount=%self.shared.mount_target.as_str(), generation=previous.generation, "pending open superseded");
            let _ = previous.tx.send(Err(ModalError::Superseded));
        }
        OpenModal { rx }
    }

    /// Hide the modal without settling a pending `open()`. No-op when hidden.
    pub fn close(&self) {
        let _slot = self.shared.lock();
        if self.shared.set_visible(false) {
            tracing::debug!(target: "console_core::modal", mount=%self.shared.mount_target.as_str(), "modal closed");
        }
    }

    pub fn is_visible(&self) -> bool {
        self.shared.is_visible()
    }

    /// Replace the props the renderer draws with.
    pub fn set_props(&self, props: P) {
        self.shared.view.send_modify(|view| view.props = props);
    }

    pub fn update_props(&self, f: impl FnOnce(&mut P)) {
        self.shared.view.send_modify(|view| f(&mut view.props));
    }
}

/// Future returned by [`ModalController::open`].
#[must_use = "the modal outcome is only observed by awaiting this future"]
pub struct OpenModal<V> {
    rx: oneshot::Receiver<Result<ModalOutcome<V>, ModalError>>,
}

impl<V> Future for OpenModal<V> {
    type Output = Result<ModalOutcome<V>, ModalError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|settled| settled.unwrap_or(Err(ModalError::Detached)))
    }
}
