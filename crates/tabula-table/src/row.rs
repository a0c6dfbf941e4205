//! Rows of cells

use crate::cell::Cell;
use crate::events::{SharedEmitter, SubscriptionHandle};
use crate::item::{ItemId, TableItem, TableItemType};

/// A horizontal run of cells
///
/// The row shares its table's emitter, so cells created through
/// [`push_cell`](Row::push_cell) notify on the same bus as the row itself.
pub struct Row {
    item: TableItem,
    values: Vec<Cell>,
}

impl Row {
    pub fn new(emitter: SharedEmitter) -> Self {
        Self {
            item: TableItem::new(emitter, TableItemType::Row),
            values: Vec::new(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.item.id()
    }

    pub fn item(&self) -> &TableItem {
        &self.item
    }

    /// Append a cell; notifies the row's updated channel
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

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.id())
            .field("len", &self.values.len())
            .finish()
    }
}

/// Structural view of a row
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RowRecord {
    pub id: ItemId,
    pub values: Vec<crate::cell::CellRecord>,
}

#[cfg(feature = "serde")]
impl From<&Row> for RowRecord {
    fn from(row: &Row) -> Self {
        Self {
            id: row.id(),
            values: row.values.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl Row {
    /// Rebuild a row from its structural view, with fresh ids throughout
    pub fn from_record(emitter: SharedEmitter, record: &RowRecord) -> Self {
        let mut row = Self::new(emitter.clone());
        row.values = record
            .values
            .iter()
            .map(|c| Cell::from_record(emitter.clone(), c))
            .collect();
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventEmitter;
    use pretty_assertions::assert_eq;
    use std::cell::Cell as Counter;
    use std::rc::Rc;
    use tabula_core::ExpectedType;

    #[test]
    fn test_push_cell_notifies_row() {
        let emitter = EventEmitter::shared();
        let mut row = Row::new(emitter.clone());
        let hits = Rc::new(Counter::new(0));
        let h = hits.clone();
        row.on_updated(move |_| h.set(h.get() + 1));
        row.push_cell(Cell::new(emitter.clone(), ExpectedType::General));
        row.push_cell(Cell::new(emitter, ExpectedType::Number));
        assert_eq!(hits.get(), 2);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_cell_access() {
        let emitter = EventEmitter::shared();
        let mut row = Row::new(emitter.clone());
        row.push_cell(Cell::with_text(emitter, ExpectedType::General, "hello"));
        assert_eq!(row.get(0).unwrap().raw_text(), "hello");
        assert!(row.get(1).is_none());
        row.get_mut(0).unwrap().set_value("world").unwrap();
        assert_eq!(row.get(0).unwrap().raw_text(), "world");
    }
}
