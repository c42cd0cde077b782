// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod canvas;
pub mod config;
pub mod error;
pub mod format;
#[cfg(feature = "preview")]
pub mod preview;

// External crate imports
use bon::Builder;
use image::{ImageFormat, RgbaImage};
use log::{debug, info};

// Standard library imports
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

pub use canvas::Canvas;
pub use config::Color;
pub use error::{MeterError, Result};
pub use format::{FloatFormat, FormatError};

use config::{
    BAR_BASELINE, BAR_GAP, BAR_WIDTH, IN_RANGE, IN_RANGE_START, MARKER_HEIGHT,
    MARKER_LABEL_GAP, MARKER_TOP, MARKER_WIDTH, MAX_LABEL_INSET, METER_HEIGHT, METER_WIDTH,
    MIN_LABEL_INSET, OVER_RANGE, OVER_RANGE_START, RULE_HEIGHT, RULE_LABEL_Y, UNDER_RANGE,
    UNDER_RANGE_START, ZONES, ZONE_STARTS,
};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct MeterConfig {
    /// Lower bound of the in-range zone
    #[builder(default = 0.0)]
    pub min_value: f64,
    /// Upper bound of the in-range zone
    #[builder(default = 100.0)]
    pub max_value: f64,
    /// The measurement shown by the marker
    #[builder(default = 0.0)]
    pub value: f64,

    /// Text for the min bound; formatted from `min_value` when unset
    #[builder(into)]
    pub min_value_label: Option<String>,
    /// Text for the max bound; formatted from `max_value` when unset
    #[builder(into)]
    pub max_value_label: Option<String>,

    /// printf-style pattern used for every numeric label
    #[builder(into, default = "%.2f".to_string())]
    pub format: String,
    #[builder(default = false)]
    pub transparent: bool,

    #[builder(default = 0)]
    pub padding_x: u32,
    #[builder(default = 0)]
    pub padding_y: u32,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A single three-zone meter, rendered to a PNG on demand
#[derive(Debug, Clone, Default)]
pub struct Meter {
    config: MeterConfig,
}

impl Meter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MeterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }

    pub fn set_min(&mut self, min_value: f64) {
        self.config.min_value = min_value;
    }

    pub fn set_max(&mut self, max_value: f64) {
        self.config.max_value = max_value;
    }

    pub fn set_value(&mut self, value: f64) {
        self.config.value = value;
    }

    pub fn set_format(&mut self, format: impl Into<String>) {
        self.config.format = format.into();
    }

    pub fn set_padding(&mut self, padding_x: u32, padding_y: u32) {
        self.config.padding_x = padding_x;
        self.config.padding_y = padding_y;
    }

    pub fn set_min_label(&mut self, label: impl Into<String>) {
        self.config.min_value_label = Some(label.into());
    }

    pub fn set_max_label(&mut self, label: impl Into<String>) {
        self.config.max_value_label = Some(label.into());
    }

    pub fn set_transparent(&mut self, transparent: bool) {
        self.config.transparent = transparent;
    }

    /// Canvas dimensions: the fixed drawing area plus padding on every side.
    pub fn canvas_size(&self) -> Result<(u32, u32)> {
        let grow = |base: u32, padding: u32| {
            padding
                .checked_mul(2)
                .and_then(|p| p.checked_add(base))
                .ok_or_else(|| MeterError::Configuration(format!("padding {padding} is too large")))
        };
        Ok((
            grow(METER_WIDTH, self.config.padding_x)?,
            grow(METER_HEIGHT, self.config.padding_y)?,
        ))
    }

    /// Where the marker goes for the current configuration.
    pub fn marker(&self) -> Result<Marker> {
        Marker::locate(
            self.config.min_value,
            self.config.max_value,
            self.config.value,
        )
    }

    /// Build the ordered list of draw commands for this meter.
    pub fn scene(&self) -> Result<Scene> {
        let format = FloatFormat::parse(&self.config.format)?;
        let marker = self.marker()?;
        debug!(
            "marker {:?}: value {} in [{}, {}] at x = {:.2}",
            marker.placement,
            self.config.value,
            self.config.min_value,
            self.config.max_value,
            marker.position
        );

        let origin = (
            to_offset(self.config.padding_x)?,
            to_offset(self.config.padding_y)?,
        );
        let mut scene = Scene::new(origin);

        if !self.config.transparent {
            scene.add_command(DrawCommand::Rect {
                x: 0,
                y: 0,
                width: METER_WIDTH as i32,
                height: METER_HEIGHT as i32,
                color: Color::WHITE,
            });
        }

        let boundary_label = |label: &Option<String>, bound: f64| {
            label
                .as_deref()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format.format(bound))
        };
        add_rule(
            &mut scene,
            boundary_label(&self.config.min_value_label, self.config.min_value),
            boundary_label(&self.config.max_value_label, self.config.max_value),
        );
        add_bars(&mut scene);
        add_marker(&mut scene, &marker, format.format(self.config.value));

        Ok(scene)
    }

    /// Render into a freshly allocated RGBA image.
    pub fn render_image(&self) -> Result<RgbaImage> {
        let scene = self.scene()?;
        let (width, height) = self.canvas_size()?;
        let mut image = RgbaImage::new(width, height);
        {
            let frame: &mut [u8] = &mut image;
            let mut canvas = Canvas::new(frame, width as usize, height as usize);
            scene.render(&mut canvas);
        }
        Ok(image)
    }

    /// Render and encode as PNG, without touching storage.
    pub fn render_png(&self) -> Result<Vec<u8>> {
        let image = self.render_image()?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render and write the PNG to `path`.
    pub fn render(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.render_png()?;
        let storage = |source| MeterError::Storage {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::create(path).map_err(storage)?;
        file.write_all(&bytes).map_err(storage)?;
        file.flush().map_err(storage)?;

        info!("wrote {} byte meter image to {}", bytes.len(), path.display());
        Ok(())
    }
}

fn to_offset(padding: u32) -> Result<i32> {
    i32::try_from(padding)
        .map_err(|_| MeterError::Configuration(format!("padding {padding} is too large")))
}

// ============================================================================
// MARKER PLACEMENT
// ============================================================================

/// Which zone the value falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Below,
    Within,
    Above,
}

/// Columns beyond this are far off any canvas; keeps label offsets from overflowing
const MARKER_COLUMN_LIMIT: i32 = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub placement: Placement,
    /// Unpadded x position before truncation
    pub position: f64,
    /// Unpadded pixel column, truncated and bounded to `±2^24`
    pub column: i32,
}

impl Marker {
    /// Map `value` onto the scale.
    ///
    /// Values outside the range are clamped to at most one range-width past
    /// the violated bound. `[min, max]` is closed: the bounds themselves land
    /// on the edges of the in-range zone.
    pub fn locate(min: f64, max: f64, value: f64) -> Result<Self> {
        let wide = max - min;
        if !(wide.is_finite() && wide > 0.0) {
            return Err(MeterError::Configuration(format!(
                "maximum ({max}) must be greater than minimum ({min})"
            )));
        }

        let (placement, position) = if value < min {
            let value = value.max(min - wide);
            // The under-range zone maps the clamped value itself, not its
            // offset from `min`.
            let pos = f64::from(UNDER_RANGE.width()) * value / wide;
            (Placement::Below, pos + f64::from(UNDER_RANGE_START))
        } else if value > max {
            let value = value.min(max + wide);
            let pos = f64::from(OVER_RANGE.width()) * (value - max) / wide;
            (Placement::Above, pos + f64::from(OVER_RANGE_START))
        } else {
            let pos = f64::from(IN_RANGE.width()) * (value - min) / wide;
            (Placement::Within, pos + f64::from(IN_RANGE_START))
        };

        Ok(Self {
            placement,
            position,
            column: (position as i32).clamp(-MARKER_COLUMN_LIMIT, MARKER_COLUMN_LIMIT),
        })
    }
}

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

/// A drawing primitive in unpadded meter coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    HLine {
        x1: i32,
        y: i32,
        x2: i32,
        color: Color,
    },
    VLine {
        x: i32,
        y1: i32,
        y2: i32,
        color: Color,
    },
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    },
    Label {
        x: i32,
        y: i32,
        text: String,
        color: Color,
    },
}

/// Ordered draw commands plus the padding translation applied when rendered
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    origin: (i32, i32),
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(origin: (i32, i32)) -> Self {
        Self {
            origin,
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Replay every command in order; later commands overwrite earlier ones.
    pub fn render(&self, canvas: &mut Canvas) {
        let (ox, oy) = self.origin;
        let at = |x: i32, y: i32| (ox.saturating_add(x), oy.saturating_add(y));
        for command in &self.commands {
            match command {
                DrawCommand::HLine { x1, y, x2, color } => {
                    let ((x1, y), (x2, _)) = (at(*x1, *y), at(*x2, *y));
                    canvas.h_line(x1, y, x2, *color);
                }
                DrawCommand::VLine { x, y1, y2, color } => {
                    let ((x, y1), (_, y2)) = (at(*x, *y1), at(*x, *y2));
                    canvas.v_line(x, y1, y2, *color);
                }
                DrawCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => {
                    let (x, y) = at(*x, *y);
                    canvas.fill_rect(x, y, *width, *height, *color);
                }
                DrawCommand::Label { x, y, text, color } => {
                    let (x, y) = at(*x, *y);
                    canvas.label(x, y, text, *color);
                }
            }
        }
    }
}

// ============================================================================
// SCENE CONSTRUCTION
// ============================================================================

/// Zone separators and the two boundary labels.
fn add_rule(scene: &mut Scene, min_label: String, max_label: String) {
    // Last column of the under-range zone, first column of the over-range zone
    for x in [UNDER_RANGE_START + UNDER_RANGE.width() - 1, OVER_RANGE_START] {
        scene.add_command(DrawCommand::VLine {
            x,
            y1: 0,
            y2: RULE_HEIGHT,
            color: Color::BLACK,
        });
    }

    scene.add_command(DrawCommand::Label {
        x: UNDER_RANGE_START + MIN_LABEL_INSET,
        y: RULE_LABEL_Y,
        text: min_label,
        color: Color::GRAY,
    });
    scene.add_command(DrawCommand::Label {
        x: OVER_RANGE_START + MAX_LABEL_INSET,
        y: RULE_LABEL_Y,
        text: max_label,
        color: Color::GRAY,
    });
}

/// Bottom-anchored bars, growing one pixel taller per bar across the scale.
fn add_bars(scene: &mut Scene) {
    for (zone, start) in ZONES.iter().zip(ZONE_STARTS) {
        for i in 0..zone.bars {
            let height = zone.base_height + i;
            scene.add_command(DrawCommand::Rect {
                x: start + (BAR_WIDTH + BAR_GAP) * i,
                y: BAR_BASELINE - height,
                width: BAR_WIDTH,
                height,
                color: zone.color,
            });
        }
    }
}

fn add_marker(scene: &mut Scene, marker: &Marker, label: String) {
    scene.add_command(DrawCommand::Rect {
        x: marker.column,
        y: MARKER_TOP,
        width: MARKER_WIDTH,
        height: MARKER_HEIGHT,
        color: Color::ORANGE,
    });
    scene.add_command(DrawCommand::Label {
        x: marker
            .column
            .saturating_add(MARKER_WIDTH + MARKER_LABEL_GAP),
        y: MARKER_TOP + MARKER_HEIGHT,
        text: label,
        color: Color::DARK,
    });
}
