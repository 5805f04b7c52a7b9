use std::collections::BTreeMap;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::{filter_and_rank, RankedAnswer};
use crate::data::model::{CleanedTable, Dimension};
use crate::data::registry::TableRegistry;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the user picked on one tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub question: Option<&'static str>,
    pub segment: Option<String>,
}

/// The full UI state, independent of rendering. Tables live in the shared
/// registry; only selections and the derived chart data are held here.
pub struct AppState {
    pub registry: Arc<TableRegistry>,

    /// Tab currently shown.
    pub active: Dimension,

    /// Per-tab selections, kept when switching tabs.
    pub selections: BTreeMap<Dimension, Selection>,

    /// Ranked answers for the active tab (`None` until selections are complete).
    pub results: Option<Vec<RankedAnswer>>,

    /// Bar colours for `results`.
    pub color_map: ColorMap,
}

impl AppState {
    pub fn new(registry: Arc<TableRegistry>) -> Self {
        Self {
            registry,
            active: Dimension::National,
            selections: BTreeMap::new(),
            results: None,
            color_map: ColorMap::default(),
        }
    }

    pub fn table(&self) -> &CleanedTable {
        self.registry.get(self.active)
    }

    pub fn selection(&self) -> Selection {
        self.selections.get(&self.active).cloned().unwrap_or_default()
    }

    pub fn select_tab(&mut self, dimension: Dimension) {
        if self.active != dimension {
            self.active = dimension;
            self.refresh();
        }
    }

    pub fn set_question(&mut self, question: &'static str) {
        self.selections.entry(self.active).or_default().question = Some(question);
        self.refresh();
    }

    pub fn set_segment(&mut self, value: String) {
        self.selections.entry(self.active).or_default().segment = Some(value);
        self.refresh();
    }

    /// Re-run the query for the active tab after a selection change.
    pub fn refresh(&mut self) {
        let selection = self.selection();
        let needs_segment = self.active.segment_name().is_some();

        self.results = match (selection.question, selection.segment.as_deref()) {
            (Some(q), segment) if !needs_segment || segment.is_some() => {
                Some(filter_and_rank(self.table(), q, segment))
            }
            _ => None,
        };

        self.color_map = match &self.results {
            Some(rows) => ColorMap::new(rows.iter().map(|r| r.answer.as_str())),
            None => ColorMap::default(),
        };
    }

    /// Prompt shown instead of a chart while selections are incomplete.
    pub fn placeholder(&self) -> String {
        match self.active.segment_name() {
            None => "Select a question to see results".to_string(),
            Some(segment) => format!("Select a question and a {segment} to see results"),
        }
    }
}
