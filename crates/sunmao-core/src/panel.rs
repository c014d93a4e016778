//! The mortise/tenon panel tree.
//!
//! Panels live in an arena owned by [`PanelTree`] and are addressed by [`MortiseId`]. A panel
//! knows its parent by id only; children are listed per side. The tree also owns the
//! [`Figure`] every panel's canvas is allocated from.

use crate::canvas::{AxesId, Figure};
use crate::config::SunmaoConfig;
use crate::error::{Error, Result};
use crate::geom::{FigureRect, NominalSize, is_positive_finite, nominal_size};
use crate::layout::{self, LayoutSolution};
use crate::legend::LegendManager;
use crate::side::{Axis, Side};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MortiseId(pub usize);

impl fmt::Display for MortiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mortise-{}", self.0)
    }
}

/// One panel of the tree.
#[derive(Debug, Clone)]
pub struct Mortise {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) axis_off: bool,
    pub(crate) title: Option<String>,
    pub(crate) title_side: Side,
    pub(crate) pad: f64,
    pub(crate) parent: Option<MortiseId>,
    pub(crate) tenons: [Vec<MortiseId>; 4],
    pub(crate) axes: Option<AxesId>,
    pub(crate) position: Option<FigureRect>,
    pub(crate) layout: Option<LayoutSolution>,
}

impl Mortise {
    fn new(size: NominalSize, axis_off: bool) -> Self {
        Self {
            width: size.width,
            height: size.height,
            axis_off,
            title: None,
            title_side: Side::Top,
            pad: 0.0,
            parent: None,
            tenons: Default::default(),
            axes: None,
            position: None,
            layout: None,
        }
    }

    /// Nominal size in absolute units.
    pub fn size(&self) -> NominalSize {
        nominal_size(self.width, self.height)
    }

    pub fn is_axis_off(&self) -> bool {
        self.axis_off
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn title_side(&self) -> Side {
        self.title_side
    }

    pub fn pad(&self) -> f64 {
        self.pad
    }

    pub fn parent(&self) -> Option<MortiseId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn tenons(&self, side: Side) -> &[MortiseId] {
        &self.tenons[side.index()]
    }

    /// Canvas handle from the latest render, if any.
    pub fn axes(&self) -> Option<AxesId> {
        self.axes
    }

    /// Figure-fraction rectangle from the latest render, if any.
    pub fn position(&self) -> Option<FigureRect> {
        self.position
    }

    /// Envelope computed by the most recent layout of this panel.
    pub fn cached_layout(&self) -> Option<LayoutSolution> {
        self.layout
    }
}

#[derive(Debug, Clone)]
pub struct RootOptions {
    /// Figure size in inches; also the root panel's nominal size.
    pub size: (f64, f64),
    pub axis_off: bool,
    /// Render as soon as the root exists, so canvases are always live.
    pub auto_render: bool,
    pub config: SunmaoConfig,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            size: (10.0, 8.0),
            axis_off: false,
            auto_render: true,
            config: SunmaoConfig::default(),
        }
    }
}

impl RootOptions {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = (width, height);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenonOptions {
    /// Height factor for top/bottom tenons, width factor for left/right ones.
    pub size: f64,
    pub pad: f64,
    pub title: Option<String>,
    pub title_side: Side,
    pub axis_off: bool,
    /// After a re-layout, copy the parent's x range (top/bottom) or y range (left/right).
    pub auto_align: bool,
}

impl Default for TenonOptions {
    /// Fixed defaults; [`PanelTree::tenon_options`] starts from the tree's configuration.
    fn default() -> Self {
        Self {
            size: 1.0,
            pad: 0.05,
            title: None,
            title_side: Side::Top,
            axis_off: false,
            auto_align: true,
        }
    }
}

impl TenonOptions {
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_title_side(mut self, side: Side) -> Self {
        self.title_side = side;
        self
    }

    pub fn with_axis_off(mut self, axis_off: bool) -> Self {
        self.axis_off = axis_off;
        self
    }

    pub fn with_auto_align(mut self, auto_align: bool) -> Self {
        self.auto_align = auto_align;
        self
    }
}

/// What happens when the requested side of the parent already has a tenon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachPolicy {
    /// Attach to the end of the chain on that side instead.
    Redirect,
    /// Fail with [`Error::SideOccupied`].
    Strict,
    /// Add another sibling on the same side.
    Stack,
}

/// The result of [`create_root`]: the tree plus the id of its root panel.
#[derive(Debug)]
pub struct Assembly<F: Figure> {
    pub tree: PanelTree<F>,
    pub root: MortiseId,
}

/// Builds a one-panel tree on `figure`, rendering it immediately when `auto_render` is set.
pub fn create_root<F: Figure>(figure: F, options: RootOptions) -> Result<Assembly<F>> {
    let RootOptions {
        size: (width, height),
        axis_off,
        auto_render,
        config,
    } = options;
    for value in [width, height] {
        if !is_positive_finite(value) {
            return Err(Error::InvalidSize {
                what: "figure size",
                value,
            });
        }
    }
    config.validate()?;

    let root = MortiseId(0);
    let mut tree = PanelTree {
        figure,
        nodes: vec![Mortise::new(nominal_size(width, height), axis_off)],
        root,
        config,
        auto_render,
        rendered: false,
        legends: None,
        shares: Vec::new(),
    };
    if auto_render {
        tree.render()?;
    }
    Ok(Assembly { tree, root })
}

/// Arena of panels sharing one figure.
#[derive(Debug)]
pub struct PanelTree<F: Figure> {
    pub(crate) figure: F,
    pub(crate) nodes: Vec<Mortise>,
    pub(crate) root: MortiseId,
    pub(crate) config: SunmaoConfig,
    pub(crate) auto_render: bool,
    pub(crate) rendered: bool,
    pub(crate) legends: Option<LegendManager>,
    /// `(axis, leader, follower)` bindings made by `share`, rebound after every re-layout.
    pub(crate) shares: Vec<(Axis, MortiseId, MortiseId)>,
}

impl<F: Figure> PanelTree<F> {
    pub fn root(&self) -> MortiseId {
        self.root
    }

    pub fn config(&self) -> &SunmaoConfig {
        &self.config
    }

    /// Tenon options with this tree's configured default size and pad.
    pub fn tenon_options(&self) -> TenonOptions {
        self.config.tenon_options()
    }

    pub fn figure(&self) -> &F {
        &self.figure
    }

    pub fn figure_mut(&mut self) -> &mut F {
        &mut self.figure
    }

    pub fn into_figure(self) -> F {
        self.figure
    }

    pub fn auto_render(&self) -> bool {
        self.auto_render
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: MortiseId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: MortiseId) -> Result<&Mortise> {
        self.nodes.get(id.0).ok_or(Error::UnknownPanel { id })
    }

    pub(crate) fn node_mut(&mut self, id: MortiseId) -> Result<&mut Mortise> {
        self.nodes.get_mut(id.0).ok_or(Error::UnknownPanel { id })
    }

    pub fn parent(&self, id: MortiseId) -> Option<MortiseId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Direct tenons of `id` on `side`, in attachment order.
    pub fn children(&self, id: MortiseId, side: Side) -> &[MortiseId] {
        self.nodes
            .get(id.0)
            .map(|n| n.tenons(side))
            .unwrap_or_default()
    }

    pub fn position(&self, id: MortiseId) -> Option<FigureRect> {
        self.nodes.get(id.0).and_then(|n| n.position)
    }

    /// The side of its parent `id` hangs on; `None` for the root.
    pub fn side_of(&self, id: MortiseId) -> Option<Side> {
        let parent = self.parent(id)?;
        Side::ALL
            .into_iter()
            .find(|side| self.children(parent, *side).contains(&id))
    }

    /// Attaches a tenon, redirecting on the root and refusing an occupied side elsewhere.
    pub fn attach(
        &mut self,
        parent: MortiseId,
        side: Side,
        options: TenonOptions,
    ) -> Result<MortiseId> {
        let policy = if self.node(parent)?.is_root() {
            AttachPolicy::Redirect
        } else {
            AttachPolicy::Strict
        };
        self.attach_with(parent, side, options, policy)
    }

    pub fn attach_with(
        &mut self,
        parent: MortiseId,
        side: Side,
        options: TenonOptions,
        policy: AttachPolicy,
    ) -> Result<MortiseId> {
        if !is_positive_finite(options.size) {
            return Err(Error::InvalidSize {
                what: "tenon size",
                value: options.size,
            });
        }
        if !(options.pad.is_finite() && options.pad >= 0.0) {
            return Err(Error::InvalidSize {
                what: "tenon pad",
                value: options.pad,
            });
        }

        let occupied = !self.node(parent)?.tenons(side).is_empty();
        let target = match policy {
            AttachPolicy::Redirect if occupied => self.outermost(parent, side)?,
            AttachPolicy::Strict if occupied => return Err(Error::SideOccupied { side }),
            _ => parent,
        };

        let host = self.node(target)?;
        let size = if side.is_vertical_stack() {
            nominal_size(host.width, host.height * options.size)
        } else {
            nominal_size(host.width * options.size, host.height)
        };
        for value in [size.width, size.height] {
            if !is_positive_finite(value) {
                return Err(Error::InvalidSize {
                    what: "tenon extent",
                    value,
                });
            }
        }
        let host_rendered = host.axes.is_some();

        let id = MortiseId(self.nodes.len());
        let mut node = Mortise::new(size, options.axis_off);
        node.parent = Some(target);
        node.title = options.title;
        node.title_side = options.title_side;
        node.pad = options.pad;
        self.nodes.push(node);
        self.node_mut(target)?.tenons[side.index()].push(id);
        // An ancestor envelope can still overflow.
        if let Err(err) = self.check_geometry() {
            self.nodes.pop();
            self.node_mut(target)?.tenons[side.index()].pop();
            return Err(err);
        }
        if let Some(manager) = self.legends.as_mut() {
            manager.add_mortise(id);
        }
        debug!(
            %side,
            parent = %parent,
            host = %target,
            child = %id,
            redirected = target != parent,
            "attached tenon"
        );

        if host_rendered {
            self.relayout()?;
            if options.auto_align {
                self.auto_align(target, id, side);
            }
        }
        Ok(id)
    }

    /// End of the chain reached by following the first tenon on `side`.
    pub fn outermost(&self, id: MortiseId, side: Side) -> Result<MortiseId> {
        let mut current = id;
        while let Some(&next) = self.node(current)?.tenons(side).first() {
            current = next;
        }
        Ok(current)
    }

    /// The `index`-th tenon on `side`; negative indices count from the end.
    pub fn get_child(&self, id: MortiseId, side: Side, index: isize) -> Option<MortiseId> {
        let tenons = self.children(id, side);
        let resolved = if index < 0 {
            tenons.len().checked_sub(index.unsigned_abs())?
        } else {
            index.unsigned_abs()
        };
        tenons.get(resolved).copied()
    }

    pub fn get_root(&self, id: MortiseId) -> Result<MortiseId> {
        let mut current = id;
        while let Some(parent) = self.node(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Envelope of `id` and its direct tenons; the result is kept on the panel.
    pub fn calculate_layout(&mut self, id: MortiseId) -> Result<LayoutSolution> {
        let solution = self.solve(id)?;
        self.node_mut(id)?.layout = Some(solution);
        Ok(solution)
    }

    fn solve(&self, id: MortiseId) -> Result<LayoutSolution> {
        let nodes = &self.nodes;
        let node = self.node(id)?;
        let tenons = Side::ALL.into_iter().flat_map(move |side| {
            node.tenons(side)
                .iter()
                .map(move |child| (side, nodes[child.0].size()))
        });
        layout::solve(node.size(), tenons)
    }

    /// Solves every panel's envelope without touching any canvas.
    pub(crate) fn check_geometry(&self) -> Result<()> {
        for id in self.iter() {
            self.solve(id)?;
        }
        Ok(())
    }

    /// Panel ids below and including `id`: the panel, then its top, bottom, left and right
    /// subtrees.
    pub fn descendants(&self, id: MortiseId) -> Vec<MortiseId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current.0) else {
                continue;
            };
            out.push(current);
            for side in Side::ALL.into_iter().rev() {
                stack.extend(node.tenons(side).iter().rev().copied());
            }
        }
        out
    }

    /// Every panel, root first.
    pub fn iter(&self) -> std::vec::IntoIter<MortiseId> {
        self.descendants(self.root).into_iter()
    }

    /// Indented dump of nominal sizes and tenons below `id`.
    pub fn structure(&self, id: MortiseId) -> Result<String> {
        let mut out = String::new();
        self.write_structure(&mut out, id, 0)?;
        Ok(out)
    }

    fn write_structure(&self, out: &mut String, id: MortiseId, level: usize) -> Result<()> {
        let node = self.node(id)?;
        let indent = "  ".repeat(level);
        if !out.is_empty() {
            out.push('\n');
        }
        // Debug keeps the trailing `.0` on whole numbers.
        let _ = write!(
            out,
            "{indent}mortise(figsize=({:?}, {:?}))",
            node.width, node.height
        );
        for side in Side::ALL {
            let tenons = node.tenons(side);
            if tenons.is_empty() {
                continue;
            }
            let _ = write!(out, "\n{indent}  {side}:");
            for &child in tenons {
                self.write_structure(out, child, level + 2)?;
            }
        }
        Ok(())
    }
}
