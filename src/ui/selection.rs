use crate::models::{SizeKey, Style};

/// The style and aspect ratio currently picked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub style: Style,
    pub size: SizeKey,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn select_size(&mut self, size: SizeKey) {
        self.size = size;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
