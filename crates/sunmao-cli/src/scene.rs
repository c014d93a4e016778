//! JSON scene documents: a panel tree, the series drawn on it, and how its legends are laid out.

use crate::CliError;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use sunmao::canvas::ArtistStyle;
use sunmao::render::FigureLayout;
use sunmao::{
    AttachPolicy, Axis, AxisSelect, Canvas, LegendLocation, LegendMode, LegendPlacement,
    LegendRequest, MemoryAxes, MemoryFigure, MortiseId, PanelTree, RootOptions, Side,
    SunmaoConfig, TenonOptions, create_memory_root,
};

/// Name series and legend settings use for the root panel.
pub const ROOT_NAME: &str = "root";

fn default_figsize() -> [f64; 2] {
    [10.0, 8.0]
}

fn root_name() -> String {
    ROOT_NAME.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    #[serde(default = "default_figsize")]
    pub figsize: [f64; 2],
    #[serde(default)]
    pub axis_off: bool,
    /// Partial `SunmaoConfig` object.
    #[serde(default)]
    pub config: Option<Value>,
    /// Decorations of the root panel.
    #[serde(default)]
    pub axes: Option<AxesSpec>,
    #[serde(default)]
    pub panels: Vec<PanelSpec>,
    #[serde(default)]
    pub series: Vec<SeriesSpec>,
    #[serde(default)]
    pub legend: Option<LegendSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelSpec {
    pub side: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Size factor; the configured default when absent.
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub pad: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_side: Option<String>,
    #[serde(default)]
    pub axis_off: bool,
    /// Add a sibling on an occupied side instead of chaining outward.
    #[serde(default)]
    pub stack: bool,
    #[serde(default)]
    pub axes: Option<AxesSpec>,
    #[serde(default)]
    pub children: Vec<PanelSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxesSpec {
    #[serde(default)]
    pub xlim: Option<[f64; 2]>,
    #[serde(default)]
    pub ylim: Option<[f64; 2]>,
    #[serde(default)]
    pub xlabel: Option<String>,
    #[serde(default)]
    pub ylabel: Option<String>,
    #[serde(default)]
    pub grid: bool,
    #[serde(default)]
    pub face_color: Option<String>,
    /// Copy this panel's view range onto its one-hop tenons once the series are drawn.
    #[serde(default)]
    pub align: Option<AxisSelect>,
    /// Bind the tenons' view ranges to this panel's.
    #[serde(default)]
    pub share: Option<AxisSelect>,
}

impl AxesSpec {
    fn apply(&self, canvas: &mut MemoryAxes) {
        if let Some([lo, hi]) = self.xlim {
            canvas.set_limits(Axis::X, (lo, hi));
        }
        if let Some([lo, hi]) = self.ylim {
            canvas.set_limits(Axis::Y, (lo, hi));
        }
        if let Some(label) = &self.xlabel {
            canvas.set_axis_label(Axis::X, label);
        }
        if let Some(label) = &self.ylabel {
            canvas.set_axis_label(Axis::Y, label);
        }
        if self.grid {
            canvas.set_grid(true);
        }
        if let Some(color) = &self.face_color {
            canvas.set_face_color(color);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    #[default]
    Line,
    Scatter,
    Image,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesSpec {
    #[serde(default = "root_name")]
    pub panel: String,
    #[serde(default)]
    pub kind: SeriesKind,
    /// Defaults to `0..y.len()`.
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<f64>,
    /// Image rows, first row on top.
    #[serde(default)]
    pub rows: Vec<Vec<f64>>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub line_width: Option<f64>,
    #[serde(default)]
    pub marker_size: Option<f64>,
}

impl SeriesSpec {
    fn style(&self) -> ArtistStyle {
        ArtistStyle {
            label: self.label.clone(),
            color: self.color.clone(),
            line_width: self.line_width,
            marker_size: self.marker_size,
        }
    }

    fn draw(&self, canvas: &mut MemoryAxes) -> Result<(), CliError> {
        let style = self.style();
        if let SeriesKind::Image = self.kind {
            canvas.image(&self.rows, &style);
            return Ok(());
        }
        let xs: Vec<f64> = if self.x.is_empty() {
            (0..self.y.len()).map(|i| i as f64).collect()
        } else {
            self.x.clone()
        };
        if xs.len() != self.y.len() {
            return Err(CliError::Scene(format!(
                "series on `{}` has {} x values but {} y values",
                self.panel,
                xs.len(),
                self.y.len()
            )));
        }
        match self.kind {
            SeriesKind::Scatter => canvas.scatter(&xs, &self.y, &style),
            _ => canvas.plot(&xs, &self.y, &style),
        };
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegendSpec {
    #[serde(default)]
    pub mode: Option<LegendMode>,
    #[serde(default)]
    pub position: Option<LegendLocation>,
    #[serde(default)]
    pub cols: Option<usize>,
    /// Panel name to local legend location.
    #[serde(default)]
    pub local: IndexMap<String, LegendLocation>,
    #[serde(default)]
    pub blocks: Option<BlocksSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlocksSpec {
    /// Every panel when absent.
    #[serde(default)]
    pub panels: Option<Vec<String>>,
    /// The configured placement when absent.
    #[serde(default)]
    pub placement: Option<LegendPlacement>,
}

/// A scene turned into a rendered tree, with its panel names.
#[derive(Debug)]
pub struct Built {
    pub tree: PanelTree<MemoryFigure>,
    pub names: IndexMap<String, MortiseId>,
}

impl Scene {
    pub fn from_json_str(text: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn build(&self) -> Result<Built, CliError> {
        let config = match &self.config {
            Some(value) => SunmaoConfig::from_value(value.clone())?,
            None => SunmaoConfig::default(),
        };
        let [width, height] = self.figsize;
        let assembly = create_memory_root(RootOptions {
            size: (width, height),
            axis_off: self.axis_off,
            // Build the whole tree first so it is laid out once.
            auto_render: false,
            config,
        })?;
        let root = assembly.root;
        let mut built = Built {
            tree: assembly.tree,
            names: IndexMap::new(),
        };
        built.names.insert(ROOT_NAME.to_string(), root);

        let mut decorated: Vec<(MortiseId, &AxesSpec)> =
            self.axes.iter().map(|axes| (root, axes)).collect();
        for spec in &self.panels {
            built.attach(root, spec, &mut decorated)?;
        }
        built.tree.render()?;

        for (id, axes) in &decorated {
            axes.apply(built.tree.canvas_mut(*id)?);
        }
        for series in &self.series {
            let id = built.lookup(&series.panel)?;
            series.draw(built.tree.canvas_mut(id)?)?;
        }
        for (id, axes) in &decorated {
            if let Some(select) = axes.align {
                built.tree.align(*id, select, None)?;
            }
            if let Some(select) = axes.share {
                built.tree.share(*id, select, None)?;
            }
        }
        if let Some(legend) = &self.legend {
            built.apply_legend(legend)?;
        }
        Ok(built)
    }
}

impl Built {
    fn attach<'s>(
        &mut self,
        parent: MortiseId,
        spec: &'s PanelSpec,
        decorated: &mut Vec<(MortiseId, &'s AxesSpec)>,
    ) -> Result<(), CliError> {
        let side: Side = spec.side.parse()?;
        let defaults = self.tree.tenon_options();
        let mut options = TenonOptions {
            size: spec.size.unwrap_or(defaults.size),
            pad: spec.pad.unwrap_or(defaults.pad),
            axis_off: spec.axis_off,
            ..defaults
        };
        if let Some(title) = &spec.title {
            options = options.with_title(title.clone());
        }
        if let Some(title_side) = &spec.title_side {
            options = options.with_title_side(title_side.parse()?);
        }

        let id = if spec.stack {
            self.tree
                .attach_with(parent, side, options, AttachPolicy::Stack)?
        } else {
            self.tree.attach(parent, side, options)?
        };
        if let Some(name) = &spec.name {
            if self.names.contains_key(name) {
                return Err(CliError::Scene(format!("duplicate panel name `{name}`")));
            }
            self.names.insert(name.clone(), id);
        }
        if let Some(axes) = &spec.axes {
            decorated.push((id, axes));
        }
        for child in &spec.children {
            self.attach(id, child, decorated)?;
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<MortiseId, CliError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| CliError::Scene(format!("unknown panel `{name}`")))
    }

    fn apply_legend(&mut self, spec: &LegendSpec) -> Result<(), CliError> {
        if let Some(mode) = spec.mode {
            let mut request = LegendRequest {
                position: spec.position,
                cols: spec.cols,
                ..Default::default()
            };
            for (name, location) in &spec.local {
                request = request.with_local(self.lookup(name)?, *location);
            }
            self.tree.create_legend(mode, &request)?;
        } else if let Some(position) = spec.position {
            self.tree.set_legend_position(position, spec.cols)?;
        }

        if let Some(blocks) = &spec.blocks {
            let panels = match &blocks.panels {
                Some(names) => Some(
                    names
                        .iter()
                        .map(|name| self.lookup(name))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                None => None,
            };
            self.tree
                .place_legend_blocks(panels.as_deref(), blocks.placement.as_ref())?;
        }
        Ok(())
    }

    /// Fills in panel names on a layout dump.
    pub fn name_panels(&self, layout: &mut FigureLayout) {
        for panel in &mut layout.panels {
            panel.name = self
                .names
                .iter()
                .find(|(_, id)| **id == panel.id)
                .map(|(name, _)| name.clone());
        }
    }
}
