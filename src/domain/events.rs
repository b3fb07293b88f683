use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

use strum::IntoStaticStr;

use crate::domain::genome::Normalization;
use crate::domain::view::{BrowserId, DisplayMode};
use crate::view_state::ViewState;

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> u64 {
        use crate::domain::logging::get_time_provider;
        get_time_provider().current_timestamp()
    }
}

/// Payload published after every committed view-state change.
#[derive(Debug, Clone, PartialEq)]
pub struct LocusChange {
    pub state: ViewState,
    pub resolution_changed: bool,
    pub chr_changed: bool,
    pub dragging: bool,
    /// Synced peers follow this change only when set.
    pub propagate: bool,
}

/// Everything a browser instance (or the page-wide bus) announces.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum HicEvent {
    LocusChange(LocusChange),
    MapLoad { dataset_name: String },
    ControlMapLoad { dataset_name: String },
    GenomeChange { genome_id: String },
    BrowserSelect { browser: BrowserId },
    NormalizationChange { normalization: Normalization },
    DisplayModeChange { mode: DisplayMode },
    TileCacheInvalidated,
    InteractionShield { engaged: bool },
}

impl DomainEvent for HicEvent {
    fn event_type(&self) -> &'static str {
        self.into()
    }
}

impl HicEvent {
    pub fn as_locus_change(&self) -> Option<&LocusChange> {
        match self {
            HicEvent::LocusChange(change) => Some(change),
            _ => None,
        }
    }
}

pub type SubscriptionId = u64;

type Handler<E> = Rc<dyn Fn(&E)>;

/// Single-threaded publish/subscribe channel.
///
/// Delivery is synchronous and follows subscription order. Handlers may
/// subscribe or unsubscribe while an event is being delivered; such changes
/// apply from the next `post`.
pub struct EventChannel<E> {
    next_id: Cell<SubscriptionId>,
    handlers: RefCell<Vec<(SubscriptionId, Handler<E>)>>,
}

impl<E: DomainEvent> EventChannel<E> {
    pub fn new() -> Self {
        Self { next_id: Cell::new(1), handlers: RefCell::new(Vec::new()) }
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Returns `false` when the id was never issued or already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn post(&self, event: E) {
        let snapshot: Vec<Handler<E>> =
            self.handlers.borrow().iter().map(|(_, handler)| Rc::clone(handler)).collect();

        crate::log_trace!(
            crate::domain::logging::LogComponent::Domain("EventChannel"),
            "📣 {} -> {} subscriber(s)",
            event.event_type(),
            snapshot.len()
        );

        for handler in snapshot {
            handler(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl<E: DomainEvent> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}
