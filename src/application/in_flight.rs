use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};

use crate::domain::errors::{NavResult, NavigationError};
use crate::domain::events::{EventChannel, HicEvent};
use crate::domain::logging::LogComponent;

/// One navigation at a time per browser. Starting a new one aborts the
/// previous request, which then resolves to `Superseded` without committing.
#[derive(Default)]
pub struct NavigationSlot {
    generation: Cell<u64>,
    current: RefCell<Option<AbortHandle>>,
}

impl NavigationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the in-flight request, if any, and start a new generation.
    pub fn supersede(&self) -> u64 {
        if let Some(previous) = self.current.borrow_mut().take() {
            previous.abort();
            crate::log_debug!(
                LogComponent::Application("NavigationSlot"),
                "⏹️ Superseded navigation #{}",
                self.generation.get()
            );
        }
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    /// Drive `operation` as the current navigation.
    pub async fn run<F, T>(&self, operation: F) -> NavResult<T>
    where
        F: Future<Output = NavResult<T>>,
    {
        let generation = self.supersede();
        let (handle, registration) = AbortHandle::new_pair();
        *self.current.borrow_mut() = Some(handle);

        let outcome = Abortable::new(operation, registration).await;

        if self.generation.get() == generation {
            self.current.borrow_mut().take();
        }
        match outcome {
            Ok(result) => result,
            Err(_aborted) => Err(NavigationError::Superseded),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }
}

/// Depth-counted busy indicator. The page blocks gestures while engaged.
pub struct InteractionShield {
    depth: Cell<usize>,
    events: Rc<EventChannel<HicEvent>>,
}

impl InteractionShield {
    pub fn new(events: Rc<EventChannel<HicEvent>>) -> Self {
        Self { depth: Cell::new(0), events }
    }

    pub fn engage(self: &Rc<Self>) -> ShieldGuard {
        let depth = self.depth.get();
        self.depth.set(depth + 1);
        if depth == 0 {
            self.events.post(HicEvent::InteractionShield { engaged: true });
        }
        ShieldGuard { shield: Rc::clone(self) }
    }

    pub fn is_engaged(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Releases the shield when dropped, whatever way the operation ended.
pub struct ShieldGuard {
    shield: Rc<InteractionShield>,
}

impl Drop for ShieldGuard {
    fn drop(&mut self) {
        let depth = self.shield.depth.get().saturating_sub(1);
        self.shield.depth.set(depth);
        if depth == 0 {
            self.shield.events.post(HicEvent::InteractionShield { engaged: false });
        }
    }
}
