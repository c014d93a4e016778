//! Legend aggregation over a registered set of panels.

use super::placement::{LegendPlacement, place};
use super::{
    LegendLocation, LegendMode, LegendOutcome, LegendRecord, LocalLegend, MortiseLegend,
};
use crate::canvas::{
    ArtistId, AxesLegendSpec, Canvas, Figure, FigureLegendSpec, LegendEntry, LegendId,
};
use crate::error::{Error, Result};
use crate::legend::LegendFrame;
use crate::panel::{MortiseId, PanelTree};
use indexmap::IndexMap;
use tracing::debug;

/// Legend-creation parameters; `None` fields take the tree's configured defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegendRequest {
    /// Location of the global legend.
    pub position: Option<LegendLocation>,
    /// Columns of the global legend; defaults to the number of unique labels, at most four.
    pub cols: Option<usize>,
    /// Per-panel locations of local legends.
    pub local_positions: IndexMap<MortiseId, LegendLocation>,
}

impl LegendRequest {
    pub fn at(position: LegendLocation) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn with_cols(mut self, cols: usize) -> Self {
        self.cols = Some(cols);
        self
    }

    pub fn with_local(mut self, id: MortiseId, location: LegendLocation) -> Self {
        self.local_positions.insert(id, location);
        self
    }
}

/// Tracks which panels take part in legends and which figure legends it created.
#[derive(Debug, Clone, Default)]
pub struct LegendManager {
    mortises: Vec<MortiseId>,
    global_legend: Option<LegendId>,
    blocks: Vec<LegendId>,
}

fn check_columns(cols: Option<usize>) -> Result<()> {
    if cols == Some(0) {
        return Err(Error::InvalidGrid {
            message: "legend needs at least one column".to_string(),
        });
    }
    Ok(())
}

impl LegendManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager with every panel of `tree` registered, root first.
    pub fn for_tree<F: Figure>(tree: &PanelTree<F>) -> Self {
        Self {
            mortises: tree.iter().collect(),
            ..Default::default()
        }
    }

    pub fn add_mortise(&mut self, id: MortiseId) {
        if !self.mortises.contains(&id) {
            self.mortises.push(id);
        }
    }

    pub fn mortises(&self) -> &[MortiseId] {
        &self.mortises
    }

    pub fn global_legend(&self) -> Option<LegendId> {
        self.global_legend
    }

    pub fn blocks(&self) -> &[LegendId] {
        &self.blocks
    }

    /// Drops figure-legend handles after the figure was cleared underneath them.
    pub(crate) fn forget_figure_legends(&mut self) {
        self.global_legend = None;
        self.blocks.clear();
    }

    /// Labeled entries of every registered panel that has a canvas.
    pub fn collect<F: Figure>(&self, tree: &PanelTree<F>) -> LegendRecord {
        let mut record = LegendRecord::default();
        for &id in &self.mortises {
            let Some(canvas) = tree.canvas(id) else {
                continue;
            };
            let entries = canvas.legend_entries();
            if entries.is_empty() {
                continue;
            }
            let mut local = MortiseLegend::default();
            for LegendEntry { artist, label } in entries {
                record.handles.push(artist);
                record.labels.push(label.clone());
                record.unique_labels.insert(label.clone());
                local.handles.push(artist);
                local.labels.push(label);
            }
            record.mortise_legends.insert(id, local);
        }
        record
    }

    /// The automatic mode for a figure with `unique_labels` labels over `panels` panels.
    pub fn choose_mode(unique_labels: usize, panels: usize) -> LegendMode {
        if unique_labels <= 3 && panels <= 2 {
            LegendMode::Global
        } else if unique_labels > 6 || panels > 4 {
            LegendMode::Local
        } else {
            LegendMode::Mixed
        }
    }

    /// One deduplicated figure legend; `None` when nothing is labeled.
    pub fn create_global<F: Figure>(
        &mut self,
        tree: &mut PanelTree<F>,
        position: Option<LegendLocation>,
        cols: Option<usize>,
    ) -> Result<Option<LegendId>> {
        check_columns(cols)?;
        let record = self.collect(tree);
        if record.is_empty() {
            return Ok(None);
        }
        let entries: Vec<LegendEntry> = record
            .deduplicated()
            .into_iter()
            .map(|(label, artist)| LegendEntry::new(artist, label))
            .collect();
        let columns = cols.unwrap_or_else(|| entries.len().min(4)).max(1);

        if let Some(old) = self.global_legend.take() {
            tree.figure.remove_legend(old);
        }
        let id = tree.figure.legend(FigureLegendSpec {
            entries,
            location: position.unwrap_or(tree.config.global_legend_location),
            columns,
            anchor: None,
            title: None,
            frame: LegendFrame::default(),
        });
        self.global_legend = Some(id);
        Ok(Some(id))
    }

    /// A canvas-native legend on every registered panel with labeled entries.
    pub fn create_local<F: Figure>(
        &mut self,
        tree: &mut PanelTree<F>,
        positions: &IndexMap<MortiseId, LegendLocation>,
    ) -> IndexMap<MortiseId, LocalLegend> {
        let default = tree.config.local_legend_location;
        let mut out = IndexMap::new();
        for &id in &self.mortises {
            let Some(canvas) = tree.live_canvas_mut(id) else {
                continue;
            };
            let entries = canvas.legend_entries();
            if entries.is_empty() {
                continue;
            }
            let location = positions.get(&id).copied().unwrap_or(default);
            let count = entries.len();
            canvas.legend(AxesLegendSpec {
                entries,
                location,
                columns: 1,
            });
            out.insert(
                id,
                LocalLegend {
                    location,
                    entries: count,
                },
            );
        }
        out
    }

    /// Global and local legends together. Labels shown locally still appear globally.
    pub fn create_mixed<F: Figure>(
        &mut self,
        tree: &mut PanelTree<F>,
        request: &LegendRequest,
    ) -> Result<(Option<LegendId>, IndexMap<MortiseId, LocalLegend>)> {
        let global = self.create_global(tree, request.position, request.cols)?;
        let local = self.create_local(tree, &request.local_positions);
        Ok((global, local))
    }

    pub fn create<F: Figure>(
        &mut self,
        tree: &mut PanelTree<F>,
        mode: LegendMode,
        request: &LegendRequest,
    ) -> Result<LegendOutcome> {
        let mode = match mode {
            LegendMode::Auto => {
                let unique = self.collect(tree).unique_labels.len();
                let chosen = Self::choose_mode(unique, self.mortises.len());
                debug!(unique, panels = self.mortises.len(), mode = %chosen, "chose legend mode");
                chosen
            }
            explicit => explicit,
        };
        Ok(match mode {
            LegendMode::Global => LegendOutcome::Global {
                legend: self.create_global(tree, request.position, request.cols)?,
            },
            LegendMode::Local => LegendOutcome::Local {
                legends: self.create_local(tree, &request.local_positions),
            },
            LegendMode::Mixed | LegendMode::Auto => {
                let (global, local) = self.create_mixed(tree, request)?;
                LegendOutcome::Mixed { global, local }
            }
        })
    }

    /// Picks the mode from the current labels and panel count, then creates it.
    pub fn auto<F: Figure>(
        &mut self,
        tree: &mut PanelTree<F>,
        request: &LegendRequest,
    ) -> Result<LegendOutcome> {
        self.create(tree, LegendMode::Auto, request)
    }

    /// One framed figure legend per panel in `panels` that has labeled entries, arranged
    /// around the figure by `placement`.
    pub fn place_blocks<F: Figure>(
        &mut self,
        tree: &mut PanelTree<F>,
        panels: &[MortiseId],
        placement: &LegendPlacement,
    ) -> Result<Vec<LegendId>> {
        let blocks: Vec<(Option<String>, Vec<LegendEntry>)> = panels
            .iter()
            .filter_map(|&id| {
                let entries = tree.canvas(id)?.legend_entries();
                if entries.is_empty() {
                    return None;
                }
                let title = tree.node(id).ok()?.title().map(str::to_string);
                Some((title, entries))
            })
            .collect();
        let anchors = place(blocks.len(), placement)?;

        let mut ids = Vec::with_capacity(blocks.len());
        for ((title, entries), anchor) in blocks.into_iter().zip(anchors) {
            let id = tree.figure.legend(FigureLegendSpec {
                entries,
                location: anchor.corner.into(),
                columns: 1,
                anchor: Some(anchor.point),
                title,
                frame: placement.frame.clone(),
            });
            ids.push(id);
        }
        debug!(
            blocks = ids.len(),
            side = %placement.side,
            "placed legend blocks"
        );
        self.blocks.extend_from_slice(&ids);
        Ok(ids)
    }

    /// Removes the global legend, every legend block and every panel's native legend.
    pub fn clear_all<F: Figure>(&mut self, tree: &mut PanelTree<F>) {
        if let Some(id) = self.global_legend.take() {
            tree.figure.remove_legend(id);
        }
        for id in self.blocks.drain(..) {
            tree.figure.remove_legend(id);
        }
        for &id in &self.mortises {
            if let Some(canvas) = tree.live_canvas_mut(id) {
                canvas.remove_legend();
            }
        }
    }
}

impl<F: Figure> PanelTree<F> {
    /// The tree's legend manager, created on first use with every current panel registered.
    /// Panels attached afterwards are registered as they are created.
    pub fn legend_manager(&mut self) -> &mut LegendManager {
        if self.legends.is_none() {
            let manager = LegendManager::for_tree(self);
            self.legends = Some(manager);
        }
        self.legends.get_or_insert_with(LegendManager::new)
    }

    fn with_legends<T>(&mut self, f: impl FnOnce(&mut LegendManager, &mut Self) -> T) -> T {
        let mut manager = match self.legends.take() {
            Some(manager) => manager,
            None => LegendManager::for_tree(self),
        };
        let out = f(&mut manager, self);
        self.legends = Some(manager);
        out
    }

    pub fn create_legend(
        &mut self,
        mode: LegendMode,
        request: &LegendRequest,
    ) -> Result<LegendOutcome> {
        self.ensure_rendered()?;
        self.with_legends(|manager, tree| manager.create(tree, mode, request))
    }

    pub fn clear_legends(&mut self) {
        if self.legends.is_some() {
            self.with_legends(|manager, tree| manager.clear_all(tree));
        }
    }

    /// Replaces every legend with one global legend at `position`.
    pub fn set_legend_position(
        &mut self,
        position: LegendLocation,
        cols: Option<usize>,
    ) -> Result<Option<LegendId>> {
        check_columns(cols)?;
        self.ensure_rendered()?;
        self.with_legends(|manager, tree| {
            manager.clear_all(tree);
            manager.create_global(tree, Some(position), cols)
        })
    }

    /// Arranges legend blocks for `panels` (every panel when `None`) around the figure.
    pub fn place_legend_blocks(
        &mut self,
        panels: Option<&[MortiseId]>,
        placement: Option<&LegendPlacement>,
    ) -> Result<Vec<LegendId>> {
        self.ensure_rendered()?;
        let panels = match panels {
            Some(panels) => panels.to_vec(),
            None => self.iter().collect(),
        };
        let placement = placement.cloned().unwrap_or_else(|| self.config.placement.clone());
        self.with_legends(|manager, tree| manager.place_blocks(tree, &panels, &placement))
    }

    /// Appends one entry to the native legend of `id`, creating the legend if needed.
    pub fn add_legend_item(
        &mut self,
        id: MortiseId,
        artist: ArtistId,
        label: impl Into<String>,
    ) -> Result<()> {
        let canvas = self.canvas_mut(id)?;
        let mut entries = if canvas.has_legend() == Some(true) {
            canvas.legend_entries()
        } else {
            Vec::new()
        };
        entries.push(LegendEntry::new(artist, label));
        canvas.legend(AxesLegendSpec {
            entries,
            location: LegendLocation::Best,
            columns: 1,
        });
        Ok(())
    }
}
