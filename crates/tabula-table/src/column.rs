//! Columns of cells

use crate::cell::Cell;
use crate::events::{SharedEmitter, SubscriptionHandle};
use crate::item::{ItemId, TableItem, TableItemType};

/// A vertical run of cells
pub struct Column {
    item: TableItem,
    values: Vec<Cell>,
}

impl Column {
    pub fn new(emitter: SharedEmitter) -> Self {
        Self {
            item: TableItem::new(emitter, TableItemType::Column),
            values: Vec::new(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.item.id()
    }

    pub fn item(&self) -> &TableItem {
        &self.item
    }

    /// Append a cell; notifies the column's updated channel
    pub fn push_cell(&mut self, cell: Cell) {
        self.values.push(cell);
        self.item.emit_updated();
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.values.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.values.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.values.iter()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.values.iter_mut()
    }

    pub fn on_updated(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.item.on_updated(callback)
    }

    pub fn on_closed(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.item.on_closed(callback)
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id())
            .field("len", &self.values.len())
            .finish()
    }
}

/// Structural view of a column
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColumnRecord {
    pub id: ItemId,
    pub values: Vec<crate::cell::CellRecord>,
}

#[cfg(feature = "serde")]
impl From<&Column> for ColumnRecord {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id(),
            values: column.values.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl Column {
    /// Rebuild a column from its structural view, with fresh ids throughout
    pub fn from_record(emitter: SharedEmitter, record: &ColumnRecord) -> Self {
        let mut column = Self::new(emitter.clone());
        column.values = record
            .values
            .iter()
            .map(|c| Cell::from_record(emitter.clone(), c))
            .collect();
        column
    }
}
