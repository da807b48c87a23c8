//! # Draft State
//!
//! Open product dialogs, keyed by draft id.
//!
//! ## Thread Safety
//! The map is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several commands touch the same draft
//! 2. Only one command should modify a draft at a time
//!
//! The lock is never held across an `.await`.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft State Operations                               │
//! │                                                                         │
//! │  UI Action                Command                     Map Change        │
//! │  ─────────                ───────                     ──────────        │
//! │                                                                         │
//! │  "New product" ─────────► open_new_product_draft ──► insert(id, draft) │
//! │                                                                         │
//! │  "Edit product" ────────► open_edit_product_draft ─► insert(id, draft) │
//! │                                                                         │
//! │  Type in a field ───────► edit_draft_field ────────► drafts[id].apply  │
//! │                                                                         │
//! │  Save ──────────────────► submit_draft ────────────► remove(id) if ok  │
//! │                                                                         │
//! │  Cancel ────────────────► discard_draft ───────────► remove(id)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mostrador_core::{CoreError, CoreResult, ProductDraft};

/// Draft state wrapper for thread-safe access.
#[derive(Clone)]
pub struct DraftState {
    drafts: Arc<Mutex<HashMap<String, ProductDraft>>>,
    max_open: usize,
}

impl DraftState {
    /// Creates an empty draft map allowing at most `max_open` drafts.
    pub fn new(max_open: usize) -> Self {
        DraftState {
            drafts: Arc::new(Mutex::new(HashMap::new())),
            max_open,
        }
    }

    // A poisoned map is still a valid map; the panicking command only
    // touched one draft.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ProductDraft>> {
        self.drafts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a freshly opened draft and returns a copy of it.
    pub fn insert(&self, draft: ProductDraft) -> CoreResult<ProductDraft> {
        let mut drafts = self.lock();
        if drafts.len() >= self.max_open {
            return Err(CoreError::TooManyDrafts { max: self.max_open });
        }
        drafts.insert(draft.id.clone(), draft.clone());
        Ok(draft)
    }

    /// Executes a function with read access to one draft.
    pub fn with_draft<F, R>(&self, id: &str, f: F) -> CoreResult<R>
    where
        F: FnOnce(&ProductDraft) -> R,
    {
        let drafts = self.lock();
        let draft = drafts
            .get(id)
            .ok_or_else(|| CoreError::DraftNotFound(id.to_string()))?;
        Ok(f(draft))
    }

    /// Executes a function with write access to one draft.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// drafts.with_draft_mut(&id, |draft| draft.apply(edit))?;
    /// ```
    pub fn with_draft_mut<F, R>(&self, id: &str, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut ProductDraft) -> R,
    {
        let mut drafts = self.lock();
        let draft = drafts
            .get_mut(id)
            .ok_or_else(|| CoreError::DraftNotFound(id.to_string()))?;
        Ok(f(draft))
    }

    /// Removes a draft, returning it.
    pub fn remove(&self, id: &str) -> CoreResult<ProductDraft> {
        self.lock()
            .remove(id)
            .ok_or_else(|| CoreError::DraftNotFound(id.to_string()))
    }

    /// Number of open drafts.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
