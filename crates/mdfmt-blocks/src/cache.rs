//! Single-flight page cache.
//!
//! [`CachedSource`] wraps a [`PageSource`] so that each page is fetched at
//! most once. Callers asking for the same page concurrently wait for the
//! first fetch and share its result; callers of different pages never wait
//! on each other. Failed fetches are not cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::block::Block;
use crate::Result;

/// Anything that can load the blocks of a page, e.g. an API client
pub trait PageSource: Send + Sync {
    fn fetch(&self, id: &str) -> Result<Vec<Block>>;
}

impl<F> PageSource for F
where
    F: Fn(&str) -> Result<Vec<Block>> + Send + Sync,
{
    fn fetch(&self, id: &str) -> Result<Vec<Block>> {
        self(id)
    }
}

/// A [`PageSource`] that caches the pages of another source
pub struct CachedSource<S> {
    source: S,
    pages: Mutex<HashMap<String, Arc<Vec<Block>>>>,
    /// One lock per page id, held while that page is fetched
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: PageSource> CachedSource<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pages: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped source
    pub fn source(&self) -> &S {
        &self.source
    }

    fn page_lock(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id.to_string()).or_default())
    }

    /// The cached page, if it was fetched before
    pub fn cached(&self, id: &str) -> Option<Arc<Vec<Block>>> {
        let pages = self.pages.lock().unwrap_or_else(PoisonError::into_inner);
        pages.get(id).cloned()
    }

    /// Get a page, fetching it on the first request
    pub fn page(&self, id: &str) -> Result<Arc<Vec<Block>>> {
        let lock = self.page_lock(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(page) = self.cached(id) {
            return Ok(page);
        }

        debug!(id, "fetching page");
        let page = Arc::new(self.source.fetch(id)?);
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), Arc::clone(&page));
        Ok(page)
    }

    /// Drop a page and its fetch lock so the next request fetches it again
    pub fn invalidate(&self, id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        let mut pages = self.pages.lock().unwrap_or_else(PoisonError::into_inner);
        pages.remove(id).is_some()
    }
}

impl<S: PageSource> PageSource for CachedSource<S> {
    fn fetch(&self, id: &str) -> Result<Vec<Block>> {
        self.page(id).map(|page| page.as_ref().clone())
    }
}
