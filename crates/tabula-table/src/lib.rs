//! Reactive table elements for the tabula spreadsheet engine.
//!
//! Builds on [`tabula_core`] (typed values and classification) and
//! [`tabula_formula`] (parsing and evaluation) to provide the mutable,
//! observable layer: cells, rows, columns, and tables, each with a
//! process-unique id and per-element change-notification channels on a
//! shared [`EventEmitter`].
//!
//! ```
//! use tabula_table::{Cell, Table};
//! use tabula_core::ExpectedType;
//! use tabula_formula::NoCells;
//!
//! let mut table = Table::new();
//! let mut row = table.new_row();
//! row.push_cell(Cell::with_text(
//!     table.emitter().clone(),
//!     ExpectedType::General,
//!     "=2*3+4",
//! ));
//! table.push_row(row);
//!
//! let value = table.cell_at_mut(0, 0).unwrap().evaluate(&NoCells).unwrap();
//! assert_eq!(value.to_text(), "14");
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod events;
pub mod item;
pub mod row;
pub mod table;

pub use cell::Cell;
pub use column::Column;
pub use error::{Error, Result};
pub use events::{EventEmitter, SharedEmitter, SubscriptionHandle, SubscriptionKind};
pub use item::{ItemId, TableItem, TableItemType};
pub use row::Row;
pub use table::Table;

#[cfg(feature = "serde")]
pub use cell::CellRecord;
#[cfg(feature = "serde")]
pub use column::ColumnRecord;
#[cfg(feature = "serde")]
pub use row::RowRecord;
#[cfg(feature = "serde")]
pub use table::TableRecord;
