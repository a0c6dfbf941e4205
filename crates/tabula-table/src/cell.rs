//! Reactive cells
//!
//! A [`Cell`] owns its raw text, an advisory expected type, and a derived
//! value: either a classified literal or a deferred formula computation. The
//! raw text is the durable state; the derived value is a cache that clears
//! on every [`set_value`](Cell::set_value).

use crate::error::{Error, Result};
use crate::events::{SharedEmitter, SubscriptionHandle};
use crate::item::{ItemId, TableItem, TableItemType};
use tabula_core::{classify, CellValue, ExpectedType};
use tabula_formula::{is_formula, CellResolver, Deferred, FormulaError, ParseError};

/// Derived-value state of a cell
#[derive(Debug)]
enum CellState {
    /// Nothing classified or evaluated yet
    Empty,
    /// Non-formula text, classified eagerly
    Literal(CellValue),
    /// Parsed formula; `cached` is the last invocation result
    Formula {
        deferred: Deferred,
        cached: Option<CellValue>,
    },
    /// Formula text that failed to parse; surfaced from `evaluate`
    Broken(ParseError),
}

/// The smallest addressable table element
pub struct Cell {
    item: TableItem,
    expected: ExpectedType,
    raw: String,
    state: CellState,
}

impl Cell {
    /// Create an empty cell
    pub fn new(emitter: SharedEmitter, expected: ExpectedType) -> Self {
        Self {
            item: TableItem::new(emitter, TableItemType::Cell),
            expected,
            raw: String::new(),
            state: CellState::Empty,
        }
    }

    /// Create a cell holding `text`
    ///
    /// Malformed formula text still constructs the cell; the stored parse
    /// error surfaces from [`evaluate`](Cell::evaluate) and from
    /// [`parse_error`](Cell::parse_error). No notification fires: the id is
    /// fresh, so nothing can have subscribed yet.
    pub fn with_text(emitter: SharedEmitter, expected: ExpectedType, text: impl Into<String>) -> Self {
        let mut cell = Self::new(emitter, expected);
        cell.raw = text.into();
        cell.reclassify();
        cell
    }

    pub fn id(&self) -> ItemId {
        self.item.id()
    }

    pub fn item(&self) -> &TableItem {
        &self.item
    }

    /// The raw text as typed
    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    /// The advisory expected type
    pub fn expected_type(&self) -> ExpectedType {
        self.expected
    }

    /// True iff the raw text is the empty string
    pub fn empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The stored parse error, if the current text is a malformed formula
    pub fn parse_error(&self) -> Option<&ParseError> {
        match &self.state {
            CellState::Broken(e) => Some(e),
            _ => None,
        }
    }

    /// Replace the cell's text
    ///
    /// Always: replaces the raw text, clears the cached value, eagerly
    /// reclassifies/reparses (reporting malformed input immediately), and
    /// emits one data-updated and one updated notification — even when the
    /// new text equals the old.
    pub fn set_value(&mut self, text: impl Into<String>) -> Result<()> {
        self.raw = text.into();
        let result = self.reclassify();
        self.item.emit_data_updated();
        self.item.emit_updated();
        result
    }

    /// Evaluate the cell to a typed value
    ///
    /// Literals return their classified value; formulas invoke the deferred
    /// computation through `cells` and cache the result until the next
    /// `set_value`. A malformed formula surfaces its parse error here.
    pub fn evaluate(&mut self, cells: &dyn CellResolver) -> Result<CellValue> {
        match &mut self.state {
            CellState::Empty => Ok(CellValue::Text(String::new())),
            CellState::Literal(value) => Ok(value.clone()),
            CellState::Formula { deferred, cached } => {
                if let Some(value) = cached {
                    return Ok(value.clone());
                }
                let value = deferred
                    .invoke(cells)
                    .map_err(|e| Error::Formula(e.into()))?;
                *cached = Some(value.clone());
                Ok(value)
            }
            CellState::Broken(e) => Err(Error::Formula(FormulaError::Parse(e.clone()))),
        }
    }

    /// The tag of the last successfully evaluated value, or the declared
    /// expected type if nothing has been evaluated yet
    pub fn value_type(&self) -> ExpectedType {
        match &self.state {
            CellState::Literal(value) => value.value_type(),
            CellState::Formula {
                cached: Some(value),
                ..
            } => value.value_type(),
            _ => self.expected,
        }
    }

    // Subscription surface, delegated to the underlying table item

    pub fn on_data_updated(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.item.on_data_updated(callback)
    }

    pub fn on_next_data_updated(
        &self,
        callback: impl FnMut(ItemId) + 'static,
    ) -> SubscriptionHandle {
        self.item.on_next_data_updated(callback)
    }

    pub fn on_updated(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.item.on_updated(callback)
    }

    pub fn on_next_updated(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.item.on_next_updated(callback)
    }

    pub fn on_closed(&self, callback: impl FnMut(ItemId) + 'static) -> SubscriptionHandle {
        self.item.on_closed(callback)
    }

    pub fn unsubscribe(&self, handle: &SubscriptionHandle) {
        self.item.unsubscribe(handle);
    }

    /// Rebuild the derived state from the raw text
    fn reclassify(&mut self) -> Result<()> {
        if is_formula(&self.raw) {
            match Deferred::parse(&self.raw) {
                Ok(deferred) => {
                    self.state = CellState::Formula {
                        deferred,
                        cached: None,
                    };
                    Ok(())
                }
                Err(e) => {
                    self.state = CellState::Broken(e.clone());
                    Err(Error::Formula(FormulaError::Parse(e)))
                }
            }
        } else {
            self.state = CellState::Literal(classify(&self.raw));
            Ok(())
        }
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("id", &self.id())
            .field("expected", &self.expected)
            .field("raw", &self.raw)
            .field("state", &self.state)
            .finish()
    }
}

/// Structural view of a cell, exposing the fixed field names
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CellRecord {
    pub id: ItemId,
    pub expected_value_t: ExpectedType,
    pub value: String,
}

#[cfg(feature = "serde")]
impl From<&Cell> for CellRecord {
    fn from(cell: &Cell) -> Self {
        Self {
            id: cell.id(),
            expected_value_t: cell.expected_type(),
            value: cell.raw_text().to_string(),
        }
    }
}

#[cfg(feature = "serde")]
impl Cell {
    /// Rebuild a cell from its structural view
    ///
    /// A fresh id is allocated — ids are process-unique and never reused,
    /// so the record's id is export-only metadata.
    pub fn from_record(emitter: SharedEmitter, record: &CellRecord) -> Self {
        Self::with_text(emitter, record.expected_value_t, record.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventEmitter;
    use pretty_assertions::assert_eq;
    use std::cell::Cell as Counter;
    use std::rc::Rc;
    use tabula_formula::NoCells;

    fn num(s: &str) -> CellValue {
        CellValue::Number(s.parse().unwrap())
    }

    #[test]
    fn test_literal_cell() {
        let mut cell = Cell::with_text(EventEmitter::shared(), ExpectedType::General, "42.5");
        assert_eq!(cell.evaluate(&NoCells).unwrap(), num("42.5"));
        assert_eq!(cell.value_type(), ExpectedType::Number);
        assert!(!cell.empty());
    }

    #[test]
    fn test_empty_cell_reports_expected_type() {
        let cell = Cell::new(EventEmitter::shared(), ExpectedType::Timestamp);
        assert!(cell.empty());
        assert_eq!(cell.value_type(), ExpectedType::Timestamp);
    }

    #[test]
    fn test_formula_cell_defers_and_caches() {
        let mut cell = Cell::with_text(EventEmitter::shared(), ExpectedType::Number, "=1+2");
        // Not yet invoked: the declared type stands in
        assert_eq!(cell.value_type(), ExpectedType::Number);
        assert_eq!(cell.evaluate(&NoCells).unwrap(), num("3"));
        assert_eq!(cell.evaluate(&NoCells).unwrap(), num("3"));
        assert_eq!(cell.value_type(), ExpectedType::Number);
    }

    #[test]
    fn test_set_value_clears_cache() {
        let mut cell = Cell::with_text(EventEmitter::shared(), ExpectedType::General, "=1+2");
        assert_eq!(cell.evaluate(&NoCells).unwrap(), num("3"));
        cell.set_value("=2*3").unwrap();
        assert_eq!(cell.evaluate(&NoCells).unwrap(), num("6"));
    }

    #[test]
    fn test_malformed_formula_surfaces_parse_error() {
        let mut cell =
            Cell::with_text(EventEmitter::shared(), ExpectedType::General, "=(unterminated");
        assert_eq!(cell.parse_error(), Some(&ParseError::UnbalancedParens));
        // Not silently reclassified as text: the error is the result
        assert!(matches!(
            cell.evaluate(&NoCells),
            Err(Error::Formula(FormulaError::Parse(
                ParseError::UnbalancedParens
            )))
        ));
        assert_eq!(cell.raw_text(), "=(unterminated");
    }

    #[test]
    fn test_set_value_reports_error_but_still_replaces_and_notifies() {
        let mut cell = Cell::with_text(EventEmitter::shared(), ExpectedType::General, "1");
        let hits = Rc::new(Counter::new(0));
        let h = hits.clone();
        cell.on_data_updated(move |_| h.set(h.get() + 1));
        assert!(cell.set_value("=\"open").is_err());
        assert_eq!(cell.raw_text(), "=\"open");
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_set_value_notifies_persistent_every_call_and_one_shot_once() {
        let mut cell = Cell::with_text(EventEmitter::shared(), ExpectedType::General, "a");
        let persistent = Rc::new(Counter::new(0));
        let once = Rc::new(Counter::new(0));
        let p = persistent.clone();
        cell.on_data_updated(move |_| p.set(p.get() + 1));
        let o = once.clone();
        cell.on_next_updated(move |_| o.set(o.get() + 1));

        cell.set_value("b").unwrap();
        assert_eq!(persistent.get(), 1);
        assert_eq!(once.get(), 1);

        cell.set_value("c").unwrap();
        assert_eq!(persistent.get(), 2);
        assert_eq!(once.get(), 1, "one-shot must not re-fire");
    }

    #[test]
    fn test_set_value_notifies_even_when_text_is_unchanged() {
        let mut cell = Cell::with_text(EventEmitter::shared(), ExpectedType::General, "same");
        let hits = Rc::new(Counter::new(0));
        let h = hits.clone();
        cell.on_data_updated(move |_| h.set(h.get() + 1));
        cell.set_value("same").unwrap();
        cell.set_value("same").unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_drop_fires_closed_once_and_silences_data_updated() {
        let emitter = EventEmitter::shared();
        let closed = Rc::new(Counter::new(0));
        let data = Rc::new(Counter::new(0));
        let (channel, id);
        {
            let cell = Cell::with_text(emitter.clone(), ExpectedType::General, "x");
            id = cell.id();
            channel = cell.item().data_updated_channel();
            let c = closed.clone();
            cell.on_closed(move |_| c.set(c.get() + 1));
            let d = data.clone();
            cell.on_data_updated(move |_| d.set(d.get() + 1));
        }
        assert_eq!(closed.get(), 1);
        // Mutation-shaped traffic after destruction reaches nobody
        crate::events::emit(&emitter, &channel, id);
        assert_eq!(data.get(), 0);
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_formula_with_dependencies_reevaluates() {
        use std::collections::HashMap;
        use tabula_formula::CellAddress;

        let mut cells: HashMap<CellAddress, CellValue> = HashMap::new();
        cells.insert("A1".parse().unwrap(), num("10"));

        let mut cell = Cell::with_text(EventEmitter::shared(), ExpectedType::Number, "=A1+5");
        assert_eq!(cell.evaluate(&cells).unwrap(), num("15"));

        // Dependency changed: clear the cache through set_value and re-invoke
        cells.insert("A1".parse().unwrap(), num("20"));
        cell.set_value("=A1+5").unwrap();
        assert_eq!(cell.evaluate(&cells).unwrap(), num("25"));
    }
}
