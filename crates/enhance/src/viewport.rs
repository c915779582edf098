use core_types::Millis;

/// Axis-aligned box in document coordinates (CSS px).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap of two boxes; touching edges produce a zero-sized result.
    pub fn intersect(&self, other: &Rectangle) -> Option<Rectangle> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some(Rectangle::new(x0, y0, x1 - x0, y1 - y0))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    #[default]
    Instant,
    Smooth,
}

/// Vertical scrolling viewport over the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    scroll_y: f32,
    content_height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
            content_height: height,
        }
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.height).max(0.0)
    }

    pub fn clamp_scroll(&self, y: f32) -> f32 {
        y.clamp(0.0, self.max_scroll())
    }

    /// Returns true when the offset actually changed.
    pub fn set_scroll(&mut self, y: f32) -> bool {
        let y = self.clamp_scroll(y);
        if (y - self.scroll_y).abs() < f32::EPSILON {
            return false;
        }
        self.scroll_y = y;
        true
    }

    /// Grows the scrollable height; it never shrinks below the viewport.
    pub fn extend_content(&mut self, bottom: f32) {
        self.content_height = self.content_height.max(bottom).max(self.height);
    }

    pub fn set_content_height(&mut self, height: f32) {
        self.content_height = height.max(self.height);
        self.scroll_y = self.clamp_scroll(self.scroll_y);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.content_height = self.content_height.max(height);
        self.scroll_y = self.clamp_scroll(self.scroll_y);
    }

    /// The visible part of the document.
    pub fn visible_rect(&self) -> Rectangle {
        Rectangle::new(0.0, self.scroll_y, self.width, self.height)
    }
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// An in-flight smooth scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAnimation {
    pub from: f32,
    pub to: f32,
    pub started: Millis,
    pub duration: Millis,
}

impl ScrollAnimation {
    pub fn progress(&self, now: Millis) -> f32 {
        if self.duration == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started) as f32;
        (elapsed / self.duration as f32).min(1.0)
    }

    pub fn position_at(&self, now: Millis) -> f32 {
        if self.is_finished(now) {
            return self.to;
        }
        let eased = ease_in_out_cubic(self.progress(now));
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self, now: Millis) -> bool {
        self.progress(now) >= 1.0
    }
}
