use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::cache::DatasetCache;
use crate::data::filter::{Dimension, Selection};
use crate::data::loader::LoadedDataset;
use crate::error::LoadError;
use crate::view::DashboardView;

// ---------------------------------------------------------------------------
// Filter options: every value a multi-select can offer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Ascending.
    pub years: Vec<i32>,
    /// Source order.
    pub segments: Vec<Arc<str>>,
    /// Source order.
    pub industries: Vec<Arc<str>>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    cache: DatasetCache,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<LoadedDataset>>,

    pub options: FilterOptions,

    pub selection: Selection,

    /// Pipeline output for the current selection.
    pub view: Option<DashboardView>,

    pub segment_colors: ColorMap,
    pub industry_colors: ColorMap,

    /// Blocking load failure shown instead of the dashboard.
    pub load_error: Option<String>,

    /// Non-blocking status shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = DatasetCache::new(config.source.clone(), config.source_options.clone());
        Self {
            config,
            cache,
            dataset: None,
            options: FilterOptions::default(),
            selection: Selection::default(),
            view: None,
            segment_colors: ColorMap::default(),
            industry_colors: ColorMap::default(),
            load_error: None,
            status_message: None,
        }
    }

    pub fn source(&self) -> PathBuf {
        self.cache.source().to_path_buf()
    }

    /// Load the current source through the cache (no re-read if cached).
    pub fn load(&mut self) {
        let result = self.cache.get();
        self.apply_load(result, false);
    }

    /// Re-read the current source, keeping selected values that still exist.
    pub fn refresh(&mut self) {
        let result = self.cache.reload();
        self.apply_load(result, true);
    }

    /// Switch to another file; the selection starts over from the defaults.
    pub fn open(&mut self, path: PathBuf) {
        self.cache.set_source(path);
        let result = self.cache.get();
        self.apply_load(result, false);
    }

    fn apply_load(
        &mut self,
        result: Result<Arc<LoadedDataset>, LoadError>,
        keep_selection: bool,
    ) {
        match result {
            Ok(dataset) => self.set_dataset(dataset, keep_selection),
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.cache.source().display());
                self.load_error = Some(e.to_string());
                self.dataset = None;
                self.view = None;
            }
        }
    }

    /// Ingest a loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<LoadedDataset>, keep_selection: bool) {
        let records = &dataset.records;
        self.options = FilterOptions {
            years: records.years(),
            segments: records.segments(),
            industries: records.industries(),
        };
        self.segment_colors = ColorMap::new(&self.options.segments);
        self.industry_colors = ColorMap::new(&self.options.industries);

        let defaults = Selection::defaults(records, &self.config.default_selection);
        self.selection = if keep_selection && self.dataset.is_some() {
            let all = Selection::all(records);
            Selection {
                years: self.selection.years.intersection(&all.years).copied().collect(),
                segments: self
                    .selection
                    .segments
                    .intersection(&all.segments)
                    .cloned()
                    .collect(),
                industries: self
                    .selection
                    .industries
                    .intersection(&all.industries)
                    .cloned()
                    .collect(),
            }
        } else {
            defaults
        };

        self.status_message = match dataset.skipped.len() {
            0 => None,
            n => Some(format!("{n} row(s) skipped while loading")),
        };
        self.load_error = None;
        self.dataset = Some(dataset);
        self.rebuild_view();
    }

    /// Re-run filter and aggregation for the current selection.
    pub fn rebuild_view(&mut self) {
        self.view = self
            .dataset
            .as_ref()
            .map(|ds| DashboardView::build(&ds.records, &self.selection));
    }

    pub fn toggle_year(&mut self, year: i32) {
        if !self.selection.years.remove(&year) {
            self.selection.years.insert(year);
        }
        self.rebuild_view();
    }

    pub fn toggle_label(&mut self, dimension: Dimension, label: &Arc<str>) {
        let set = match dimension {
            Dimension::Segment => &mut self.selection.segments,
            Dimension::Industry => &mut self.selection.industries,
            Dimension::Year => return,
        };
        if !set.remove(label) {
            set.insert(Arc::clone(label));
        }
        self.rebuild_view();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Year => self.selection.years = self.options.years.iter().copied().collect(),
            Dimension::Segment => {
                self.selection.segments = self.options.segments.iter().cloned().collect()
            }
            Dimension::Industry => {
                self.selection.industries = self.options.industries.iter().cloned().collect()
            }
        }
        self.rebuild_view();
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        self.selection.clear(dimension);
        self.rebuild_view();
    }
}
