//! Modal bridge
//!
//! Turns a declaratively rendered dialog into an awaitable call. [`create`]
//! returns two halves sharing one state machine:
//!
//! - the [`ModalController`], held by whoever wants a decision from the
//!   user. `open()` shows the modal and returns a future that settles once
//!   the user confirms or cancels; `close()` hides it without settling.
//! - the [`ModalNode`], mounted once by the rendering layer at its
//!   [`MountTarget`]. The renderer watches visibility and props through it
//!   and routes the dialog's OK/Cancel buttons into `confirm()`/`cancel()`.
//!
//! ```text
//!            open()                      confirm (valid) / cancel / close()
//!  Hidden ───────────▶ Visible-Pending ─────────────────────────────────────▶ Hidden
//! ```
//!
//! At most one open call is pending at a time. Opening again while a call
//! is pending settles the earlier future with [`ModalError::Superseded`].

mod controller;
mod node;
mod validate;

pub use controller::{ModalController, OpenModal};
pub use node::{ConfirmOutcome, ModalNode};
pub use validate::{FieldErrors, Validatable, ValidatedForm};

use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, watch};

/// Where the node is mounted (a portal target in the hosting UI).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountTarget(String);

impl MountTarget {
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MountTarget {
    fn default() -> Self {
        Self("body".to_string())
    }
}

/// How a settled `open()` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome<V> {
    /// The user confirmed; carries the validated values when a validatable
    /// was supplied.
    Confirmed(Option<V>),
    Cancelled,
}

impl<V> ModalOutcome<V> {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    /// `(confirmed, values)`, the shape page code usually destructures.
    pub fn into_parts(self) -> (bool, Option<V>) {
        match self {
            Self::Confirmed(values) => (true, values),
            Self::Cancelled => (false, None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModalError {
    /// Another `open()` replaced this one before the user acted.
    #[error("modal was reopened before this call settled")]
    Superseded,
    /// Every handle to the modal was dropped while the call was pending.
    #[error("modal was dropped before this call settled")]
    Detached,
}

/// What the renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalView<P> {
    pub visible: bool,
    pub props: P,
}

type OkCallback<V> = Arc<dyn Fn(Option<&V>) + Send + Sync>;
type CancelCallback = Arc<dyn Fn() + Send + Sync>;

/// Options for [`create`].
pub struct ModalOptions<V> {
    mount_target: MountTarget,
    on_ok: Option<OkCallback<V>>,
    on_cancel: Option<CancelCallback>,
}

impl<V> Default for ModalOptions<V> {
    fn default() -> Self {
        Self {
            mount_target: MountTarget::default(),
            on_ok: None,
            on_cancel: None,
        }
    }
}

impl<V> ModalOptions<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount_target(mut self, target: MountTarget) -> Self {
        self.mount_target = target;
        self
    }

    /// Side effect run after a successful confirmation, before the pending
    /// future settles.
    pub fn on_ok(mut self, f: impl Fn(Option<&V>) + Send + Sync + 'static) -> Self {
        self.on_ok = Some(Arc::new(f));
        self
    }

    /// Side effect run on cancellation, before the pending future settles.
    pub fn on_cancel(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(f));
        self
    }
}

type Settle<V> = oneshot::Sender<Result<ModalOutcome<V>, ModalError>>;

struct Pending<V> {
    tx: Settle<V>,
    validatable: Option<Arc<dyn Validatable<Values = V>>>,
    // distinguishes this open() call from later ones
    generation: u64,
}

struct Slot<V> {
    pending: Option<Pending<V>>,
    generation: u64,
}

pub(crate) struct Shared<P, V> {
    slot: Mutex<Slot<V>>,
    view: watch::Sender<ModalView<P>>,
    mount_target: MountTarget,
    on_ok: Option<OkCallback<V>>,
    on_cancel: Option<CancelCallback>,
}

impl<P, V> Shared<P, V> {
    fn lock(&self) -> std::sync::MutexGuard<'_, Slot<V>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns whether visibility actually changed.
    fn set_visible(&self, visible: bool) -> bool {
        self.view.send_if_modified(|view| {
            if view.visible == visible {
                false
            } else {
                view.visible = visible;
                true
            }
        })
    }

    fn is_visible(&self) -> bool {
        self.view.borrow().visible
    }
}

/// Create a modal bridge.
///
/// The returned node must be mounted exactly once by the rendering layer; it
/// stays the same object for the whole lifetime of the controller.
pub fn create<P, V: Send>(
    props: P,
    options: ModalOptions<V>,
) -> (ModalController<P, V>, ModalNode<P, V>) {
    let (view, _) = watch::channel(ModalView {
        visible: false,
        props,
    });
    let shared = Arc::new(Shared {
        slot: Mutex::new(Slot {
            pending: None,
            generation: 0,
        }),
        view,
        mount_target: options.mount_target,
        on_ok: options.on_ok,
        on_cancel: options.on_cancel,
    });
    (
        ModalController::new(shared.clone()),
        ModalNode::new(shared),
    )
}
