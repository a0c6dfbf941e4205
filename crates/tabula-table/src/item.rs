//! Table element identity and lifecycle
//!
//! Every table element (table, cell, row, column) owns a process-unique id
//! drawn from one atomic counter. Ids are never reused, even across
//! destruction, so a subscription that outlives its element refers to a dead
//! channel rather than to a different, newer element.

use crate::error::Error;
use crate::events::{self, Callback, SharedEmitter, SubscriptionHandle, SubscriptionKind};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique element identifier
pub type ItemId = u64;

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate the next element id
///
/// Monotonically increasing for the life of the process; safe to call from
/// any thread.
pub fn next_item_id() -> ItemId {
    NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed)
}

/// Kind of table element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableItemType {
    Table = 0,
    Cell = 1,
    Row = 2,
    Column = 3,
}

impl TableItemType {
    /// The canonical spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            TableItemType::Table => "Table",
            TableItemType::Cell => "Cell",
            TableItemType::Row => "Row",
            TableItemType::Column => "Column",
        }
    }

    /// The serialized index (0-3)
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for TableItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableItemType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Table" => Ok(TableItemType::Table),
            "Cell" => Ok(TableItemType::Cell),
            "Row" => Ok(TableItemType::Row),
            "Column" => Ok(TableItemType::Column),
            _ => Err(Error::UnknownItemType(s.to_string())),
        }
    }
}

/// Identity plus notification surface shared by every table element
///
/// Channel names derive from the id: `"<id>_data_updated"`,
/// `"<id>_updated"`, `"<id>_closed"`.
pub struct TableItem {
    id: ItemId,
    kind: TableItemType,
    emitter: SharedEmitter,
}

impl TableItem {
    pub fn new(emitter: SharedEmitter, kind: TableItemType) -> Self {
        Self {
            id: next_item_id(),
            kind,
            emitter,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn kind(&self) -> TableItemType {
        self.kind
    }

    pub fn emitter(&self) -> &SharedEmitter {
        &self.emitter
    }

    pub fn data_updated_channel(&self) -> String {
        format!("{}_data_updated", self.id)
    }

    pub fn updated_channel(&self) -> String {
        format!("{}_updated", self.id)
    }

    pub fn closed_channel(&self) -> String {
        format!("{}_closed", self.id)
    }

    /// Subscribe to every update of this element
    pub fn on_updated(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.subscribe(self.updated_channel(), SubscriptionKind::Persistent, callback)
    }

    /// Subscribe to exactly the next update of this element
    pub fn on_next_updated(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.subscribe(self.updated_channel(), SubscriptionKind::Once, callback)
    }

    /// Subscribe to every data change of this element
    pub fn on_data_updated(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.subscribe(
            self.data_updated_channel(),
            SubscriptionKind::Persistent,
            callback,
        )
    }

    /// Subscribe to exactly the next data change of this element
    pub fn on_next_data_updated(
        &self,
        callback: impl FnMut(ItemId) + 'static,
    ) -> SubscriptionHandle {
        self.subscribe(self.data_updated_channel(), SubscriptionKind::Once, callback)
    }

    /// Subscribe to this element's destruction; fires exactly once
    pub fn on_closed(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.subscribe(self.closed_channel(), SubscriptionKind::Persistent, callback)
    }

    /// Remove one subscription
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) {
        self.emitter.borrow_mut().unsubscribe(handle);
    }

    pub fn emit_updated(&self) {
        events::emit(&self.emitter, &self.updated_channel(), self.id);
    }

    pub fn emit_data_updated(&self) {
        events::emit(&self.emitter, &self.data_updated_channel(), self.id);
    }

    fn subscribe(
        &self,
        channel: String,
        kind: SubscriptionKind,
        callback: impl FnMut(ItemId) + 'static,
    ) -> SubscriptionHandle {
        let callback: Callback = Box::new(callback);
        self.emitter.borrow_mut().subscribe(&channel, kind, callback)
    }
}

impl fmt::Debug for TableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableItem")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Drop for TableItem {
    /// Closed fires first; afterwards every channel under this id is dead,
    /// so a late mutation cannot notify through a dangling channel.
    /// Destruction never fails.
    fn drop(&mut self) {
        events::close(&self.emitter, &self.closed_channel(), self.id);
        let mut emitter = self.emitter.borrow_mut();
        emitter.kill(&self.data_updated_channel());
        emitter.kill(&self.updated_channel());
    }
}
