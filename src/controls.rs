//! Gesture settings for [`crate::ChartWidget`].

/// Which gestures the chart widget reacts to, and how strongly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartControls {
    pub pan: PanControls,
    pub zoom: ZoomControls,
    pub pick: PickControls,
}

impl ChartControls {
    /// A chart that only paints; every gesture is ignored.
    pub fn disabled() -> Self {
        Self {
            pan: PanControls {
                drag: false,
                wheel: false,
                ..PanControls::default()
            },
            zoom: ZoomControls {
                ctrl_wheel: false,
                box_select: false,
                double_click_restore: false,
                ..ZoomControls::default()
            },
            pick: PickControls {
                click: false,
                escape_clears_anchor: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanControls {
    /// Left-button drag pans.
    pub drag: bool,
    /// The scroll wheel (or a trackpad swipe) pans.
    pub wheel: bool,
    /// Pixels moved per wheel notch.
    pub wheel_step: f64,
}

impl Default for PanControls {
    fn default() -> Self {
        Self {
            drag: true,
            wheel: true,
            wheel_step: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomControls {
    /// Ctrl + scroll zooms around the cursor.
    pub ctrl_wheel: bool,
    /// Each notch scales the axes by `1 ∓ wheel_factor`.
    pub wheel_factor: f64,
    /// Right-button drag selects a box to zoom into.
    pub box_select: bool,
    /// Boxes smaller than this (in pixels) are dropped.
    pub min_box_size: f64,
    /// Double click restores the automatic axis ranges.
    pub double_click_restore: bool,
    pub double_click_ms: u64,
}

impl Default for ZoomControls {
    fn default() -> Self {
        Self {
            ctrl_wheel: true,
            wheel_factor: 0.05,
            box_select: true,
            min_box_size: 4.0,
            double_click_restore: true,
            double_click_ms: 350,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickControls {
    /// A left click reports the entity under it and moves the crosshair anchor.
    pub click: bool,
    pub escape_clears_anchor: bool,
}

impl Default for PickControls {
    fn default() -> Self {
        Self {
            click: true,
            escape_clears_anchor: true,
        }
    }
}
