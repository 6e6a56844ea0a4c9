use crate::constants::SIDEBAR_ID;
use crate::frame::ParentFrameNotifier;
use crate::storage::LocalStorage;
use crate::{dom, markup, overlay, query};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;
use zethus_core::{ConfigStore, Configuration, DeferredNotifier};

pub type Store = ConfigStore<LocalStorage, DeferredNotifier<ParentFrameNotifier>>;

/// Root of the UI: the one store instance plus the document it renders into.
pub struct App {
    store: RefCell<Store>,
    notifier: DeferredNotifier<ParentFrameNotifier>,
    window: web::Window,
    document: web::Document,
}

impl App {
    pub fn new(
        window: web::Window,
        document: web::Document,
        provided: Option<Configuration>,
    ) -> anyhow::Result<Rc<Self>> {
        let params = query::QueryParams::from_pairs(dom::query_pairs(&window)?);
        let (seed, session) = params.into_seed(provided);
        let storage = LocalStorage::open(&window)?;
        let notifier = DeferredNotifier::new(ParentFrameNotifier::new(window.clone()));
        let store = ConfigStore::new(seed, session, storage, notifier.clone());
        Ok(Rc::new(Self {
            store: RefCell::new(store),
            notifier,
            window,
            document,
        }))
    }

    pub fn document(&self) -> &web::Document {
        &self.document
    }

    pub fn window(&self) -> &web::Window {
        &self.window
    }

    pub fn configuration(&self) -> Configuration {
        self.store.borrow().configuration().clone()
    }

    /// Run a store mutation, then re-render and notify the embedding page.
    /// Failures are logged and shown in the error overlay instead of
    /// escaping into the event loop.
    ///
    /// Notifications go out only after the store borrow is released, so
    /// parent listeners may call back into the app.
    pub fn run(&self, f: impl FnOnce(&mut Store) -> anyhow::Result<()>) {
        let result = f(&mut self.store.borrow_mut());
        match result {
            Ok(()) => self.render(),
            Err(e) => {
                log::error!("[app] update failed: {:?}", e);
                overlay::show_error(&self.document, &format!("{e:#}"));
            }
        }
        self.notifier.flush();
    }

    pub fn render(&self) {
        let html = markup::sidebar(self.store.borrow().configuration());
        if let Some(el) = self.document.get_element_by_id(SIDEBAR_ID) {
            el.set_inner_html(&html);
        }
    }

    pub fn persist(&self) {
        if let Err(e) = self.store.borrow_mut().persist() {
            log::warn!("[app] persist failed: {e}");
        }
    }

    /// Return to defaults and reload the page.
    pub fn reset_reload(&self) {
        if let Err(e) = self.store.borrow_mut().reset() {
            log::warn!("[app] reset could not be persisted: {e}");
        }
        overlay::hide(&self.document);
        if let Err(e) = self.window.location().reload() {
            log::error!("[app] reload failed: {:?}", e);
        }
    }
}
