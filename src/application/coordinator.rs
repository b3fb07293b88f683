use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::application::browser::{ChangeFlags, HicBrowser};
use crate::domain::errors::NavigationError;
use crate::domain::logging::LogComponent;
use crate::domain::view::{BrowserId, SyncRejection, SyncState};
use crate::view_state::ViewState;

/// Result of asking a browser to follow a sync state. Never an error: a
/// browser that cannot follow simply keeps its view.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Applied(ViewState),
    NoDataset,
    /// A chromosome name is unknown to the local dataset.
    NotSynchable,
    /// No local resolution can show the requested bin size.
    Unrepresentable { bin_size: u64 },
    Failed(NavigationError),
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied(_))
    }
}

/// Forwards a browser's user-driven locus changes to its linked peers.
pub struct SyncCoordinator {
    source: Weak<HicBrowser>,
    peers: RefCell<Vec<Weak<HicBrowser>>>,
}

impl SyncCoordinator {
    pub fn new(source: Weak<HicBrowser>) -> Self {
        Self { source, peers: RefCell::new(Vec::new()) }
    }

    pub fn add_peer(&self, peer: &Rc<HicBrowser>) {
        if Weak::ptr_eq(&self.source, &Rc::downgrade(peer)) {
            return;
        }
        let mut peers = self.peers.borrow_mut();
        peers.retain(|existing| existing.strong_count() > 0);
        if !peers.iter().any(|existing| Weak::ptr_eq(existing, &Rc::downgrade(peer))) {
            peers.push(Rc::downgrade(peer));
        }
    }

    pub fn remove_peer(&self, id: BrowserId) {
        self.peers
            .borrow_mut()
            .retain(|peer| peer.upgrade().is_some_and(|browser| browser.id() != id));
    }

    pub fn clear_peers(&self) {
        self.peers.borrow_mut().clear();
    }

    pub fn peer_ids(&self) -> Vec<BrowserId> {
        self.peers.borrow().iter().filter_map(Weak::upgrade).map(|browser| browser.id()).collect()
    }

    /// Push the source browser's current view to every live peer.
    pub(crate) fn propagate(&self) {
        let Some(source) = self.source.upgrade() else {
            return;
        };
        let Some(sync) = source.get_sync_state() else {
            return;
        };
        let peers: Vec<Rc<HicBrowser>> = self.peers.borrow().iter().filter_map(Weak::upgrade).collect();

        for peer in peers {
            let outcome = peer.sync_state(&sync);
            crate::log_trace!(
                LogComponent::Application("Sync"),
                "{} -> {}: {:?}",
                source.id(),
                peer.id(),
                outcome
            );
        }
    }
}

impl HicBrowser {
    /// Portable description of the current view, `None` without a dataset.
    pub fn get_sync_state(&self) -> Option<SyncState> {
        let dataset = self.dataset()?;
        SyncState::from_view(&dataset, &self.state())
    }

    pub fn can_be_synched(&self, sync: &SyncState) -> bool {
        self.dataset().is_some_and(|dataset| sync.can_be_synched(&dataset))
    }

    /// Follow another browser's view. The commit is not re-broadcast, so
    /// mutually linked browsers do not echo each other.
    pub fn sync_state(&self, sync: &SyncState) -> SyncOutcome {
        let Some(dataset) = self.dataset() else {
            return SyncOutcome::NoDataset;
        };
        let current = self.state();

        let state = match sync.translate(&dataset, &current.normalization) {
            Ok(state) => state,
            Err(SyncRejection::UnknownChromosome(name)) => {
                crate::log_debug!(
                    LogComponent::Application("Sync"),
                    "{} has no chromosome {}, not following",
                    dataset.name(),
                    name
                );
                return SyncOutcome::NotSynchable;
            }
            Err(SyncRejection::ResolutionUnavailable { bin_size }) => {
                crate::log_warn!(
                    LogComponent::Application("Sync"),
                    "⚠️ Cannot synch map {} (resolution {} not available)",
                    dataset.name(),
                    bin_size
                );
                return SyncOutcome::Unrepresentable { bin_size };
            }
        };

        self.slot.supersede();
        let flags = ChangeFlags::sync(current.zoom != state.zoom, !current.same_chromosomes(&state));
        match self.commit(state, flags) {
            Ok(state) => SyncOutcome::Applied(state),
            Err(err) => {
                crate::log_warn!(LogComponent::Application("Sync"), "Sync commit failed: {}", err);
                SyncOutcome::Failed(err)
            }
        }
    }
}
