use crate::Result;
use serde::Serialize;
use sunmao_core::canvas::FigureLegendSpec;
use sunmao_core::geom::rect_to_array;
use sunmao_core::{
    Axis, AxesId, Error as CoreError, LegendId, LegendLocation, MemoryFigure, MortiseId,
    PanelTree, Side,
};

/// Figure-fraction geometry of every panel and figure legend of a rendered tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    /// Figure size in inches.
    pub width: f64,
    pub height: f64,
    pub panels: Vec<PanelLayout>,
    pub legends: Vec<LegendLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelLayout {
    pub id: MortiseId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub axes: AxesId,
    pub parent: Option<MortiseId>,
    pub side: Option<Side>,
    pub title: Option<String>,
    /// Nominal `[width, height]`.
    pub nominal: [f64; 2],
    /// `[x, y, width, height]` in figure fractions.
    pub rect: [f64; 4],
    pub axis_off: bool,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    /// Location of the panel's own legend, if it has one.
    pub legend: Option<LegendLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendLayout {
    pub id: LegendId,
    pub location: LegendLocation,
    pub anchor: Option<[f64; 2]>,
    pub columns: usize,
    pub title: Option<String>,
    pub labels: Vec<String>,
}

impl LegendLayout {
    fn from_spec(id: LegendId, spec: &FigureLegendSpec) -> Self {
        Self {
            id,
            location: spec.location,
            anchor: spec.anchor.map(|p| [p.x, p.y]),
            columns: spec.columns,
            title: spec.title.clone(),
            labels: spec.entries.iter().map(|e| e.label.clone()).collect(),
        }
    }
}

impl FigureLayout {
    /// Reads the geometry back out of a rendered tree, panels in tree order.
    pub fn from_tree(tree: &PanelTree<MemoryFigure>) -> Result<Self> {
        let (width, height) = tree.node(tree.root())?.size().to_tuple();
        let mut panels = Vec::with_capacity(tree.len());
        for id in tree.iter() {
            let node = tree.node(id)?;
            let (Some(axes), Some(rect), Some(canvas)) =
                (node.axes(), node.position(), tree.canvas(id))
            else {
                return Err(CoreError::NotRendered { id }.into());
            };
            let (x0, x1) = canvas.view(Axis::X);
            let (y0, y1) = canvas.view(Axis::Y);
            panels.push(PanelLayout {
                id,
                name: None,
                axes,
                parent: node.parent(),
                side: tree.side_of(id),
                title: node.title().map(str::to_string),
                nominal: [node.size().width, node.size().height],
                rect: rect_to_array(&rect),
                axis_off: node.is_axis_off(),
                x_range: [x0, x1],
                y_range: [y0, y1],
                legend: canvas.native_legend().map(|l| l.location),
            });
        }
        let legends = tree
            .figure()
            .legends()
            .map(|(id, spec)| LegendLayout::from_spec(id, spec))
            .collect();
        Ok(Self {
            width,
            height,
            panels,
            legends,
        })
    }

    pub fn panel(&self, id: MortiseId) -> Option<&PanelLayout> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunmao_core::{RootOptions, TenonOptions, create_memory_root};

    #[test]
    fn unrendered_tree_has_no_layout() {
        let tree = create_memory_root(RootOptions {
            auto_render: false,
            ..Default::default()
        })
        .unwrap()
        .tree;
        let err = FigureLayout::from_tree(&tree).unwrap_err();
        assert!(matches!(err, crate::Error::Core(CoreError::NotRendered { .. })));
    }

    #[test]
    fn panels_carry_parent_and_side() {
        let assembly = create_memory_root(RootOptions::default().with_size(4.0, 2.0)).unwrap();
        let (mut tree, root) = (assembly.tree, assembly.root);
        let right = tree
            .attach(root, Side::Right, TenonOptions::sized(0.5).with_title("side"))
            .unwrap();
        let layout = FigureLayout::from_tree(&tree).unwrap();
        assert_eq!((layout.width, layout.height), (4.0, 2.0));
        assert_eq!(layout.panels.len(), 2);

        let panel = layout.panel(right).unwrap();
        assert_eq!(panel.parent, Some(root));
        assert_eq!(panel.side, Some(Side::Right));
        assert_eq!(panel.title.as_deref(), Some("side"));
        assert_eq!(panel.nominal, [2.0, 2.0]);
        assert_eq!(layout.panel(root).unwrap().side, None);

        let json = layout.to_json(false).unwrap();
        assert!(json.contains(r#""side":"right""#));
        assert!(!json.contains("\"name\""));
    }
}
