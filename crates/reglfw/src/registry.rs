use core::mem;

use crate::{CallbackSlot, WindowEvent, WindowId};

/// Maximum number of windows that can be open at once.
pub const MAX_WINDOWS: usize = 255;

pub(crate) type Handler = Box<dyn FnMut(WindowId, WindowEvent)>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct RegistryFull;

#[derive(Default)]
pub(crate) struct Slot {
    handler: Option<Handler>,
    // Bumped on every write so a handler that was checked out for a call
    // is not put back over a newer registration.
    version: u32,
}

impl Slot {
    fn set(&mut self, handler: Option<Handler>) -> Option<Handler> {
        self.version = self.version.wrapping_add(1);
        mem::replace(&mut self.handler, handler)
    }
}

pub(crate) struct Entry {
    id: WindowId,
    slots: [Slot; CallbackSlot::COUNT],
}

impl Entry {
    fn new(id: WindowId) -> Entry {
        Entry {
            id,
            slots: Default::default(),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn is_set(&self, slot: CallbackSlot) -> bool {
        self.slots[slot as usize].handler.is_some()
    }

    /// Stores `handler` in `slot` and returns the handler it replaces.
    pub fn set(&mut self, slot: CallbackSlot, handler: Option<Handler>) -> Option<Handler> {
        self.slots[slot as usize].set(handler)
    }

    /// Takes the handler out of `slot` for the duration of a call.
    pub fn checkout(&mut self, slot: CallbackSlot) -> Option<(Handler, u32)> {
        let slot = &mut self.slots[slot as usize];
        slot.handler.take().map(|handler| (handler, slot.version))
    }

    /// Puts a checked out handler back. If the slot was written while the
    /// handler was out, the handler is stale and is handed back for release.
    pub fn checkin(&mut self, slot: CallbackSlot, handler: Handler, version: u32) -> Option<Handler> {
        let slot = &mut self.slots[slot as usize];
        if slot.version == version && slot.handler.is_none() {
            slot.handler = Some(handler);
            None
        } else {
            Some(handler)
        }
    }
}

/// Open windows in creation order, each with its callback slots.
///
/// Nothing here may run user code: handlers that leave the registry are
/// returned to the caller so they are dropped outside of any borrow.
pub(crate) struct WindowRegistry {
    entries: Vec<Entry>,
}

impl WindowRegistry {
    pub fn new() -> WindowRegistry {
        WindowRegistry {
            entries: Vec::with_capacity(MAX_WINDOWS),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn insert(&mut self, id: WindowId) -> Result<(), RegistryFull> {
        if self.entries.len() >= MAX_WINDOWS {
            return Err(RegistryFull);
        }
        self.entries.push(Entry::new(id));
        Ok(())
    }

    /// Newest entry whose native pointer equals `id`.
    pub fn get(&self, id: WindowId) -> Option<&Entry> {
        self.entries.iter().rev().find(|entry| entry.id == id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Entry> {
        self.entries.iter_mut().rev().find(|entry| entry.id == id)
    }

    pub fn remove(&mut self, id: WindowId) -> Option<Entry> {
        let index = self.entries.iter().rposition(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }
}
