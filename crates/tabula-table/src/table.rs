//! The table root

use crate::cell::Cell;
use crate::events::{EventEmitter, SharedEmitter, SubscriptionHandle};
use crate::item::{ItemId, TableItem, TableItemType};
use crate::row::Row;

/// A grid of rows, owning the emitter its elements notify through
pub struct Table {
    item: TableItem,
    emitter: SharedEmitter,
    rows: Vec<Row>,
}

impl Table {
    /// A fresh table with its own emitter
    pub fn new() -> Self {
        Self::with_emitter(EventEmitter::shared())
    }

    /// A table notifying on an existing emitter
    pub fn with_emitter(emitter: SharedEmitter) -> Self {
        Self {
            item: TableItem::new(emitter.clone(), TableItemType::Table),
            emitter,
            rows: Vec::new(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.item.id()
    }

    pub fn item(&self) -> &TableItem {
        &self.item
    }

    /// The emitter shared by every element of this table
    pub fn emitter(&self) -> &SharedEmitter {
        &self.emitter
    }

    /// A new empty row sharing this table's emitter, not yet attached
    pub fn new_row(&self) -> Row {
        Row::new(self.emitter.clone())
    }

    /// Append a row; notifies the table's updated channel
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
        self.item.emit_updated();
    }

    pub fn get_row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn get_row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// The cell at zero-based (row, column), if present
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_at_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut()
    }

    pub fn on_updated(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.item.on_updated(callback)
    }

    pub fn on_closed(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.item.on_closed(callback)
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("id", &self.id())
            .field("rows", &self.rows.len())
            .finish()
    }
}

/// Structural view of a table
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TableRecord {
    pub id: ItemId,
    pub values: Vec<crate::row::RowRecord>,
}

#[cfg(feature = "serde")]
impl From<&Table> for TableRecord {
    fn from(table: &Table) -> Self {
        Self {
            id: table.id(),
            values: table.rows.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl Table {
    /// Rebuild a table from its structural view
    ///
    /// Every element gets a fresh id and a fresh emitter; record ids are
    /// export-only metadata.
    pub fn from_record(record: &TableRecord) -> Self {
        let mut table = Self::new();
        table.rows = record
            .values
            .iter()
            .map(|r| Row::from_record(table.emitter.clone(), r))
            .collect();
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell as Counter;
    use std::rc::Rc;
    use tabula_core::ExpectedType;
    use tabula_formula::NoCells;

    fn small_table() -> Table {
        let mut table = Table::new();
        let mut row = table.new_row();
        row.push_cell(Cell::with_text(
            table.emitter().clone(),
            ExpectedType::General,
            "7",
        ));
        row.push_cell(Cell::with_text(
            table.emitter().clone(),
            ExpectedType::General,
            "=2+3",
        ));
        table.push_row(row);
        table
    }

    #[test]
    fn test_cell_at() {
        let mut table = small_table();
        assert_eq!(table.cell_at(0, 0).unwrap().raw_text(), "7");
        assert!(table.cell_at(0, 2).is_none());
        assert!(table.cell_at(1, 0).is_none());
        let value = table.cell_at_mut(0, 1).unwrap().evaluate(&NoCells).unwrap();
        assert_eq!(value.to_text(), "5");
    }

    #[test]
    fn test_push_row_notifies_table() {
        let mut table = Table::new();
        let hits = Rc::new(Counter::new(0));
        let h = hits.clone();
        table.on_updated(move |_| h.set(h.get() + 1));
        table.push_row(table.new_row());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_cell_update_seen_through_shared_emitter() {
        let mut table = small_table();
        let seen = Rc::new(Counter::new(0u64));
        let s = seen.clone();
        table.cell_at(0, 0).unwrap().on_data_updated(move |id| s.set(id));
        let cell_id = table.cell_at(0, 0).unwrap().id();
        table.cell_at_mut(0, 0).unwrap().set_value("8").unwrap();
        assert_eq!(seen.get(), cell_id);
    }
}
