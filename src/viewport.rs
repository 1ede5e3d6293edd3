use crate::image_pipeline::{DisplayImage, WindowLevel};
use iced::widget::image::Handle;
use iced::widget::scrollable::AbsoluteOffset;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 16.0;
const ZOOM_DRAG_RATE: f32 = 0.005;

/// Interactive manipulation modes, one active at a time, all bound to the
/// primary pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    WindowLevel,
    Pan,
    Zoom,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::WindowLevel => "Window Level",
            Tool::Pan => "Pan",
            Tool::Zoom => "Zoom",
        }
    }
}

/// Effect of a pointer drag that the update loop must carry out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    /// Drag was ignored (viewport disabled, no tool, or tool not applicable).
    Ignored,
    /// Viewport state changed; the next redraw picks it up.
    Applied,
    /// Pan moved the scroll offset; the scrollable must be told to follow.
    ScrollTo(AbsoluteOffset),
}

/// Display surface state for the image currently on screen.
///
/// The viewport is a scoped resource: it is enabled when a decoded image
/// arrives and disabled unconditionally before every new decode cycle, so a
/// superseded file can never leak its transform into the next one. The tool
/// selection survives disable/enable since it belongs to the session, not to
/// a single image.
#[derive(Debug)]
pub struct Viewport {
    image: Option<DisplayImage>,
    handle: Option<Handle>,
    window: Option<WindowLevel>,
    zoom: f32,
    scroll_offset: AbsoluteOffset,
    active_tool: Option<Tool>,
    enabled: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            image: None,
            handle: None,
            window: None,
            zoom: 1.0,
            scroll_offset: AbsoluteOffset::default(),
            active_tool: None,
            enabled: false,
        }
    }
}

impl Viewport {
    /// Takes ownership of a freshly decoded image and enables the surface
    /// with the default view transform.
    pub fn enable(&mut self, image: DisplayImage) {
        self.window = image.initial_window;
        self.handle = Some(image.render(self.window));
        self.image = Some(image);
        self.zoom = 1.0;
        self.scroll_offset = AbsoluteOffset::default();
        self.enabled = true;
    }

    /// Tears the surface down. Called before every new decode cycle and when
    /// the file set is replaced.
    pub fn disable(&mut self) {
        self.image = None;
        self.handle = None;
        self.window = None;
        self.zoom = 1.0;
        self.scroll_offset = AbsoluteOffset::default();
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Marks `tool` active. No-op while the viewport is disabled.
    pub fn activate(&mut self, tool: Tool) -> bool {
        if !self.enabled {
            return false;
        }
        self.active_tool = Some(tool);
        true
    }

    pub fn active_tool(&self) -> Option<Tool> {
        self.active_tool
    }

    /// Restores the default view transform (zoom, pan, and window) without
    /// changing which tool is active. Returns `false` while disabled.
    pub fn reset_view(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.zoom = 1.0;
        self.scroll_offset = AbsoluteOffset::default();
        if let Some(image) = &self.image {
            self.window = image.initial_window;
            self.handle = Some(image.render(self.window));
        }
        true
    }

    /// Routes a primary-button drag to the active tool.
    pub fn drag(&mut self, dx: f32, dy: f32) -> DragEffect {
        if !self.enabled {
            return DragEffect::Ignored;
        }
        let Some(tool) = self.active_tool else {
            return DragEffect::Ignored;
        };

        match tool {
            Tool::Pan => {
                self.scroll_offset = AbsoluteOffset {
                    x: (self.scroll_offset.x - dx).max(0.0),
                    y: (self.scroll_offset.y - dy).max(0.0),
                };
                DragEffect::ScrollTo(self.scroll_offset)
            }
            Tool::Zoom => {
                self.zoom = (self.zoom * (1.0 - dy * ZOOM_DRAG_RATE)).clamp(MIN_ZOOM, MAX_ZOOM);
                DragEffect::Applied
            }
            Tool::WindowLevel => {
                // Color frames have no window; the drag is a no-op for them.
                let Some(mut window) = self.window else {
                    return DragEffect::Ignored;
                };
                window.adjust(dx, dy);
                self.window = Some(window);
                if let Some(image) = &self.image {
                    self.handle = Some(image.render(self.window));
                }
                DragEffect::Applied
            }
        }
    }

    /// Mirrors scroll offsets applied by the scrollbars themselves, so the
    /// pan tool continues from wherever the user left the view.
    pub fn set_scroll_offset(&mut self, offset: AbsoluteOffset) {
        if self.enabled {
            self.scroll_offset = offset;
        }
    }

    pub fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn window(&self) -> Option<WindowLevel> {
        self.window
    }

    /// On-screen size of the image under the current zoom.
    pub fn scaled_size(&self) -> Option<(f32, f32)> {
        self.image
            .as_ref()
            .map(|image| (image.width as f32 * self.zoom, image.height as f32 * self.zoom))
    }
}
