use super::{FieldErrors, ModalOutcome, ModalView, MountTarget, Shared};
use std::sync::Arc;
use tokio::sync::watch;

/// Result of routing the OK button into [`ModalNode::confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The pending call settled and the modal is hidden.
    Confirmed,
    /// Validation failed; the modal stays open and the call stays pending.
    Invalid(FieldErrors),
    /// Nothing was pending, the modal was hidden, or the call was replaced
    /// while validation ran.
    Idle,
}

/// Declarative half of a modal bridge, mounted once by the renderer.
pub struct ModalNode<P, V> {
    shared: Arc<Shared<P, V>>,
}

impl<P, V> Clone for ModalNode<P, V> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<P, V: Send> ModalNode<P, V> {
    pub(super) fn new(shared: Arc<Shared<P, V>>) -> Self {
        Self { shared }
    }

    pub fn mount_target(&self) -> &MountTarget {
        &self.shared.mount_target
    }

    pub fn is_visible(&self) -> bool {
        self.shared.is_visible()
    }

    /// Snapshot of what to draw.
    pub fn view(&self) -> ModalView<P>
    where
        P: Clone,
    {
        self.shared.view.borrow().clone()
    }

    /// Receiver that is notified whenever visibility or props change.
    pub fn subscribe(&self) -> watch::Receiver<ModalView<P>> {
        self.shared.view.subscribe()
    }

    /// The user pressed OK.
    pub async fn confirm(&self) -> ConfirmOutcome {
        let (validatable, generation) = {
            let slot = self.shared.lock();
            match &slot.pending {
                Some(p) if self.shared.is_visible() => (p.validatable.clone(), p.generation),
                _ => return ConfirmOutcome::Idle,
            }
        };

        let values = match validatable {
            Some(form) => match form.validate_fields().await {
                Ok(values) => Some(values),
                Err(errors) => {
                    tracing::debug!(target: "console_core::modal", generation, fields=errors.fields().count(), "validation failed, modal stays open");
                    return ConfirmOutcome::Invalid(errors);
                }
            },
            None => None,
        };

        // Hide and take under one lock: a pending call is never left behind
        // a hidden modal.
        let pending = {
            let mut slot = self.shared.lock();
            let current = slot
                .pending
                .as_ref()
                .is_some_and(|p| p.generation == generation);
            if !current || !self.shared.is_visible() {
                return ConfirmOutcome::Idle;
            }
            self.shared.set_visible(false);
            slot.pending.take()
        };
        let Some(pending) = pending else {
            return ConfirmOutcome::Idle;
        };

        if let Some(on_ok) = &self.shared.on_ok {
            on_ok(values.as_ref());
        }
        let _ = pending.tx.send(Ok(ModalOutcome::Confirmed(values)));
        ConfirmOutcome::Confirmed
    }

    /// The user pressed Cancel (or dismissed the dialog). Returns whether a
    /// pending call was settled.
    pub fn cancel(&self) -> bool {
        let pending = {
            let mut slot = self.shared.lock();
            if !self.shared.set_visible(false) {
                return false;
            }
            slot.pending.take()
        };
        let Some(pending) = pending else {
            return false;
        };
        if let Some(on_cancel) = &self.shared.on_cancel {
            on_cancel();
        }
        let _ = pending.tx.send(Ok(ModalOutcome::Cancelled));
        true
    }
}
