//! The sortable-table service.
//!
//! [`SortTable`] owns everything that outlives a single click: configuration,
//! the comparator registry, the column-type cache and the bindings of every
//! prepared table. Construct one per document and route header clicks to
//! [`SortTable::click`].

use std::collections::BTreeMap;

use log::{debug, info};

use crate::compare::ComparatorRegistry;
use crate::config::{Selector, SortTableConfig};
use crate::controller::{activate_header, header_state, ClickEvent, ClickOutcome, SortState};
use crate::dom::{Document, NodeId};
use crate::guess::TypeGuesser;
use crate::prepare::{plan_table, prepare_table, PreparedTable};
use crate::Result;

/// Click-to-sort behavior for the tables of one document.
#[derive(Debug)]
pub struct SortTable {
    config: SortTableConfig,
    selector: Selector,
    registry: ComparatorRegistry,
    guesser: TypeGuesser,
    tables: BTreeMap<NodeId, PreparedTable>,
    initialized: bool,
}

impl SortTable {
    /// Service with the built-in comparators.
    pub fn new(config: SortTableConfig) -> Result<Self> {
        Self::with_registry(config, ComparatorRegistry::new())
    }

    /// Service resolving annotations against `registry`.
    pub fn with_registry(config: SortTableConfig, registry: ComparatorRegistry) -> Result<Self> {
        let selector = config.parsed_selector()?;
        Ok(Self {
            config,
            selector,
            registry,
            guesser: TypeGuesser::new(),
            tables: BTreeMap::new(),
            initialized: false,
        })
    }

    pub fn config(&self) -> &SortTableConfig {
        &self.config
    }

    pub fn registry(&self) -> &ComparatorRegistry {
        &self.registry
    }

    /// Prepare every table matching the selector. Only the first successful
    /// call does anything; later calls return `Ok(0)`.
    ///
    /// Every candidate is validated before any table is modified, so an
    /// unknown sort annotation on any table leaves the whole document
    /// untouched and nothing prepared.
    ///
    /// Returns the number of tables that became sortable.
    pub fn init(&mut self, doc: &mut Document) -> Result<usize> {
        if self.initialized {
            debug!("already initialized");
            return Ok(0);
        }

        let mut plans = Vec::new();
        for table in self.selector.select_all(doc) {
            if self.tables.contains_key(&table) {
                continue;
            }
            let planned =
                plan_table(doc, table, &self.config, &self.registry, &mut self.guesser);
            match planned {
                Ok(Some(plan)) => plans.push(plan),
                Ok(None) => {}
                Err(e) => {
                    for plan in &plans {
                        self.guesser.forget(plan.table());
                    }
                    self.guesser.forget(table);
                    return Err(e);
                }
            }
        }

        let prepared = plans.len();
        for plan in plans {
            let table = plan.table();
            let bindings = plan.apply(doc, &self.config);
            self.tables.insert(table, bindings);
        }
        self.initialized = true;
        info!("{prepared} sortable tables");
        Ok(prepared)
    }

    /// Prepare a single table, whether or not it matches the selector.
    /// Preparing an already-prepared table returns the existing bindings.
    pub fn prepare(&mut self, doc: &mut Document, table: NodeId) -> Result<Option<&PreparedTable>> {
        if !self.tables.contains_key(&table) {
            match prepare_table(doc, table, &self.config, &self.registry, &mut self.guesser)? {
                Some(prepared) => {
                    self.tables.insert(table, prepared);
                }
                None => return Ok(None),
            }
        }
        Ok(self.tables.get(&table))
    }

    pub fn prepared(&self, table: NodeId) -> Option<&PreparedTable> {
        self.tables.get(&table)
    }

    /// Prepared tables in node order.
    pub fn tables(&self) -> impl Iterator<Item = &PreparedTable> {
        self.tables.values()
    }

    /// Dispatch a click. Clicks anywhere inside a sortable header cell sort
    /// by that cell's column; anything else is ignored.
    pub fn click(&self, doc: &mut Document, event: &mut ClickEvent) -> ClickOutcome {
        let Some((prepared, cell)) = self.header_cell_for(doc, event.target()) else {
            return ClickOutcome::Ignored;
        };
        if doc.has_class(cell, &self.config.class_no_sort) {
            return ClickOutcome::Ignored;
        }
        let Some(binding) = prepared.binding(cell) else {
            return ClickOutcome::Ignored;
        };

        let state = activate_header(doc, prepared, binding, &self.config);
        event.prevent_default();
        ClickOutcome::Sorted {
            table: prepared.table,
            column: binding.column,
            state,
        }
    }

    /// Click the header cell of `column` in a prepared table.
    pub fn click_column(&self, doc: &mut Document, table: NodeId, column: usize) -> ClickOutcome {
        let Some(prepared) = self.tables.get(&table) else {
            return ClickOutcome::Ignored;
        };
        let Some(cell) = doc.cell(prepared.head_row, column) else {
            return ClickOutcome::Ignored;
        };
        self.click(doc, &mut ClickEvent::new(cell))
    }

    /// The sorted column of `table` and its direction, if any.
    pub fn sort_state(&self, doc: &Document, table: NodeId) -> Option<(usize, SortState)> {
        let prepared = self.tables.get(&table)?;
        prepared.headers.iter().find_map(|h| {
            match header_state(doc, h.cell, &self.config) {
                SortState::Unsorted => None,
                state => Some((h.column, state)),
            }
        })
    }

    /// Forget a table's bindings and cached column types.
    pub fn release(&mut self, table: NodeId) {
        self.tables.remove(&table);
        self.guesser.forget(table);
    }

    /// Prepared table and header cell containing `target`.
    fn header_cell_for(&self, doc: &Document, target: NodeId) -> Option<(&PreparedTable, NodeId)> {
        let mut current = Some(target);
        while let Some(node) = current {
            let parent = doc.parent(node)?;
            if doc.is_tag(node, "th") || doc.is_tag(node, "td") {
                if let Some(prepared) = self.tables.values().find(|p| p.head_row == parent) {
                    return Some((prepared, node));
                }
            }
            current = Some(parent);
        }
        None
    }
}
