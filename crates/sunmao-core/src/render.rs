//! The render pass: turns nominal panel sizes into figure-fraction canvases.

use crate::canvas::{Canvas, Figure, HAlign, TextSpec, VAlign};
use crate::decoration::Decoration;
use crate::error::{Error, Result};
use crate::geom::{FigureRect, figure_rect, rect_to_array};
use crate::layout;
use crate::panel::{MortiseId, PanelTree};
use crate::side::Side;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Where a title goes for each `title_side`, in the canvas' own fractional space.
fn title_text(side: Side, text: &str) -> Option<TextSpec> {
    let (x, y, ha, va, rotation) = match side {
        Side::Top => return None,
        Side::Bottom => (0.5, -0.1, HAlign::Center, VAlign::Top, 0.0),
        Side::Left => (-0.1, 0.5, HAlign::Right, VAlign::Center, 90.0),
        Side::Right => (1.1, 0.5, HAlign::Left, VAlign::Center, 90.0),
    };
    Some(TextSpec {
        x,
        y,
        text: text.to_string(),
        ha,
        va,
        rotation,
    })
}

impl<F: Figure> PanelTree<F> {
    /// Lays out and draws every panel. On an already rendered tree this is a full re-layout
    /// that keeps each panel's decorations.
    pub fn render(&mut self) -> Result<()> {
        if self.rendered {
            return self.relayout();
        }
        self.render_tree()
    }

    /// Renders the tree unless it already is.
    pub fn ensure_rendered(&mut self) -> Result<()> {
        if self.rendered {
            Ok(())
        } else {
            self.render_tree()
        }
    }

    /// The canvas of `id`, if the tree has been rendered.
    pub fn canvas(&self, id: MortiseId) -> Option<&F::Axes> {
        let axes = self.nodes.get(id.0)?.axes?;
        self.figure.axes(axes)
    }

    /// The canvas of `id`, rendering the tree first if needed.
    pub fn canvas_mut(&mut self, id: MortiseId) -> Result<&mut F::Axes> {
        self.node(id)?;
        self.ensure_rendered()?;
        self.live_canvas_mut(id).ok_or(Error::NotRendered { id })
    }

    pub(crate) fn live_canvas_mut(&mut self, id: MortiseId) -> Option<&mut F::Axes> {
        let axes = self.nodes.get(id.0)?.axes?;
        self.figure.axes_mut(axes)
    }

    /// Snapshot, tear down, rebuild, restore.
    pub(crate) fn relayout(&mut self) -> Result<()> {
        debug!(panels = self.nodes.len(), "full re-layout");
        self.check_geometry()?;
        let snapshot = self.snapshot_decorations();
        self.teardown();
        self.render_tree()?;
        self.restore_decorations(&snapshot);
        Ok(())
    }

    fn snapshot_decorations(&self) -> FxHashMap<MortiseId, Decoration> {
        self.iter()
            .filter_map(|id| Some((id, Decoration::capture(self.canvas(id)?))))
            .collect()
    }

    fn restore_decorations(&mut self, snapshot: &FxHashMap<MortiseId, Decoration>) {
        for id in self.iter() {
            let Some(decoration) = snapshot.get(&id) else {
                continue;
            };
            if let Some(canvas) = self.live_canvas_mut(id) {
                decoration.restore(canvas);
            }
        }
    }

    fn teardown(&mut self) {
        self.figure.clear();
        for node in &mut self.nodes {
            node.axes = None;
            node.position = None;
            node.layout = None;
        }
        if let Some(manager) = self.legends.as_mut() {
            manager.forget_figure_legends();
        }
        self.rendered = false;
    }

    fn render_tree(&mut self) -> Result<()> {
        self.check_geometry()?;
        let [x, y, w, h] = self.config.root_inset();
        self.render_node(self.root, figure_rect(x, y, w, h))?;
        self.rebind_shares();
        self.rendered = true;
        Ok(())
    }

    fn render_node(&mut self, id: MortiseId, allotted: FigureRect) -> Result<()> {
        let node = self.node(id)?;
        let tenons: Vec<(Side, MortiseId)> = Side::ALL
            .into_iter()
            .flat_map(|side| node.tenons(side).iter().map(move |&child| (side, child)))
            .collect();
        let sizes = tenons
            .iter()
            .map(|&(side, child)| Ok((side, self.node(child)?.size())))
            .collect::<Result<Vec<_>>>()?;
        let arrangement = layout::arrange(allotted, node.size(), &sizes)?;
        let axis_off = node.axis_off;
        let title = node.title.clone().filter(|t| !t.is_empty());
        let title_side = node.title_side;

        let axes = self.figure.add_axes(arrangement.own);
        trace!(panel = %id, %axes, rect = ?rect_to_array(&arrangement.own), "placed panel");
        let canvas = self
            .figure
            .axes_mut(axes)
            .ok_or(Error::NotRendered { id })?;
        if axis_off {
            canvas.set_axis_off();
        }
        if let Some(title) = title {
            match title_text(title_side, &title) {
                Some(spec) => canvas.text(spec),
                None => canvas.set_title(&title),
            }
        }

        let node = self.node_mut(id)?;
        node.axes = Some(axes);
        node.position = Some(arrangement.own);
        node.layout = Some(arrangement.solution);

        for ((_, child), rect) in tenons.into_iter().zip(arrangement.tenons) {
            self.render_node(child, rect)?;
        }
        Ok(())
    }
}
