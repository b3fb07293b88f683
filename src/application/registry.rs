use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::application::browser::HicBrowser;
use crate::config::BrowserConfig;
use crate::domain::events::{EventChannel, HicEvent};
use crate::domain::logging::{LogComponent, Logger, get_logger};
use crate::domain::view::{BrowserId, ViewportSource};

/// All browsers embedded in one page, owned by the host application.
/// Tracks which browser menus and the locus box currently act on.
pub struct BrowserRegistry {
    browsers: RefCell<Vec<Rc<HicBrowser>>>,
    current: Cell<Option<BrowserId>>,
    next_id: Cell<u32>,
    global_events: Rc<EventChannel<HicEvent>>,
}

impl BrowserRegistry {
    pub fn new() -> Self {
        Self {
            browsers: RefCell::new(Vec::new()),
            current: Cell::new(None),
            next_id: Cell::new(1),
            global_events: Rc::new(EventChannel::new()),
        }
    }

    /// Page-wide channel (genome changes, browser selection).
    pub fn global_events(&self) -> &Rc<EventChannel<HicEvent>> {
        &self.global_events
    }

    pub fn create_browser(&self, config: BrowserConfig, viewport: Rc<dyn ViewportSource>) -> Rc<HicBrowser> {
        let id = BrowserId::from(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let browser = HicBrowser::new(id, config, viewport, Rc::clone(&self.global_events));
        self.browsers.borrow_mut().push(Rc::clone(&browser));
        browser
    }

    pub fn browser(&self, id: BrowserId) -> Option<Rc<HicBrowser>> {
        self.browsers.borrow().iter().find(|browser| browser.id() == id).cloned()
    }

    pub fn browsers(&self) -> Vec<Rc<HicBrowser>> {
        self.browsers.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.browsers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.browsers.borrow().is_empty()
    }

    /// The selected browser; with a single browser on the page, that one.
    pub fn current_browser(&self) -> Option<Rc<HicBrowser>> {
        if let Some(browser) = self.current.get().and_then(|id| self.browser(id)) {
            return Some(browser);
        }
        let browsers = self.browsers.borrow();
        if browsers.len() == 1 { browsers.first().cloned() } else { None }
    }

    pub fn set_current_browser(&self, id: BrowserId) -> bool {
        if self.browser(id).is_none() || self.current.get() == Some(id) {
            return false;
        }
        self.current.set(Some(id));
        self.global_events.post(HicEvent::BrowserSelect { browser: id });
        true
    }

    /// Drop a browser, unlinking it from every peer.
    pub fn remove_browser(&self, id: BrowserId) -> Option<Rc<HicBrowser>> {
        let removed = {
            let mut browsers = self.browsers.borrow_mut();
            let position = browsers.iter().position(|browser| browser.id() == id)?;
            browsers.remove(position)
        };
        for browser in self.browsers.borrow().iter() {
            browser.sync_coordinator().remove_peer(id);
        }
        if self.current.get() == Some(id) {
            self.current.set(None);
        }
        Some(removed)
    }

    /// Link every listed browser with every other one, replacing any earlier
    /// links. Browsers whose dataset cannot show the first browser's
    /// chromosomes are left out.
    pub fn sync_browsers(&self, ids: &[BrowserId]) -> Vec<BrowserId> {
        let candidates: Vec<Rc<HicBrowser>> = ids.iter().filter_map(|id| self.browser(*id)).collect();
        let Some(reference) = candidates.first().and_then(|browser| browser.get_sync_state()) else {
            return Vec::new();
        };

        let linked: Vec<Rc<HicBrowser>> = candidates
            .into_iter()
            .filter(|browser| browser.can_be_synched(&reference))
            .collect();

        for browser in &linked {
            let coordinator = browser.sync_coordinator();
            coordinator.clear_peers();
            for peer in &linked {
                coordinator.add_peer(peer);
            }
        }

        get_logger().info(
            LogComponent::Application("BrowserRegistry"),
            &format!("🔗 Linked {} browser(s)", linked.len()),
        );
        linked.iter().map(|browser| browser.id()).collect()
    }
}

impl Default for BrowserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
