use crate::canvas::{AxesId, Canvas, Figure};
use crate::error::{Error, Result};
use crate::panel::{MortiseId, PanelTree};
use crate::side::{Axis, AxisSelect, Side};
use tracing::debug;

fn axes_of(select: AxisSelect) -> impl Iterator<Item = Axis> {
    [
        select.includes_x().then_some(Axis::X),
        select.includes_y().then_some(Axis::Y),
    ]
    .into_iter()
    .flatten()
}

impl<F: Figure> PanelTree<F> {
    /// One-hop neighbours used when no explicit targets are given: top and bottom tenons for
    /// x, left and right tenons for y.
    pub fn default_align_targets(&self, id: MortiseId, select: AxisSelect) -> Vec<MortiseId> {
        let mut out = Vec::new();
        if select.includes_x() {
            out.extend_from_slice(self.children(id, Side::Top));
            out.extend_from_slice(self.children(id, Side::Bottom));
        }
        if select.includes_y() {
            out.extend_from_slice(self.children(id, Side::Left));
            out.extend_from_slice(self.children(id, Side::Right));
        }
        out
    }

    fn leader_axes(&mut self, id: MortiseId) -> Result<AxesId> {
        self.node(id)?;
        self.ensure_rendered()?;
        self.node(id)?.axes().ok_or(Error::NotRendered { id })
    }

    /// Copies the current view range of `id` onto each target. Targets without a canvas are
    /// skipped.
    pub fn align(
        &mut self,
        id: MortiseId,
        select: AxisSelect,
        targets: Option<&[MortiseId]>,
    ) -> Result<()> {
        let leader = self.leader_axes(id)?;
        let targets = match targets {
            Some(targets) => targets.to_vec(),
            None => self.default_align_targets(id, select),
        };
        let ranges: Vec<(Axis, (f64, f64))> = {
            let canvas = self.figure.axes(leader).ok_or(Error::NotRendered { id })?;
            axes_of(select)
                .filter_map(|axis| Some((axis, canvas.limits(axis)?)))
                .collect()
        };
        for target in &targets {
            if let Some(canvas) = self.live_canvas_mut(*target) {
                for &(axis, range) in &ranges {
                    canvas.set_limits(axis, range);
                }
            }
        }
        debug!(panel = %id, ?select, targets = targets.len(), "aligned view ranges");
        Ok(())
    }

    /// Binds each target's view range to that of `id`, so later changes propagate.
    pub fn share(
        &mut self,
        id: MortiseId,
        select: AxisSelect,
        targets: Option<&[MortiseId]>,
    ) -> Result<()> {
        let leader = self.leader_axes(id)?;
        let targets = match targets {
            Some(targets) => targets.to_vec(),
            None => self.default_align_targets(id, select),
        };
        for target in &targets {
            let Some(follower) = self.nodes.get(target.0).and_then(|n| n.axes()) else {
                continue;
            };
            for axis in axes_of(select) {
                self.figure.share_axis(axis, leader, follower);
                let binding = (axis, id, *target);
                if !self.shares.contains(&binding) {
                    self.shares.push(binding);
                }
            }
        }
        debug!(panel = %id, ?select, targets = targets.len(), "shared view ranges");
        Ok(())
    }

    /// Reinstates every `share` binding on the current canvases.
    pub(crate) fn rebind_shares(&mut self) {
        for &(axis, leader, follower) in &self.shares {
            let (Some(leader), Some(follower)) = (
                self.nodes.get(leader.0).and_then(|n| n.axes()),
                self.nodes.get(follower.0).and_then(|n| n.axes()),
            ) else {
                continue;
            };
            self.figure.share_axis(axis, leader, follower);
        }
    }

    /// Gives a freshly attached tenon the host's range along the shared edge.
    pub(crate) fn auto_align(&mut self, host: MortiseId, tenon: MortiseId, side: Side) {
        let axis = if side.is_vertical_stack() {
            Axis::X
        } else {
            Axis::Y
        };
        let Some(range) = self.canvas(host).and_then(|canvas| match canvas.autoscaled(axis) {
            Some(true) => None,
            _ => canvas.limits(axis),
        }) else {
            return;
        };
        if let Some(canvas) = self.live_canvas_mut(tenon) {
            canvas.set_limits(axis, range);
        }
    }
}
