use crate::models::{SizeKey, Style};
use crate::ui::selection::Selection;
use crate::ui::toast::Toast;
use colored::*;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionGroupKind {
    Style,
    Size,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionButton {
    pub value: &'static str,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup {
    pub kind: OptionGroupKind,
    pub buttons: Vec<OptionButton>,
}

impl OptionGroup {
    pub fn active(&self) -> Option<&OptionButton> {
        self.buttons.iter().find(|button| button.active)
    }

    pub fn active_count(&self) -> usize {
        self.buttons.iter().filter(|button| button.active).count()
    }
}

fn button(value: &'static str, active: bool) -> OptionButton {
    OptionButton {
        value,
        label: value.to_uppercase(),
        active,
    }
}

/// One button per style, the selected one active.
pub fn render_styles(selection: &Selection) -> OptionGroup {
    OptionGroup {
        kind: OptionGroupKind::Style,
        buttons: Style::ALL
            .iter()
            .map(|style| button(style.tag(), *style == selection.style))
            .collect(),
    }
}

/// One button per aspect ratio, the selected one active.
pub fn render_sizes(selection: &Selection) -> OptionGroup {
    OptionGroup {
        kind: OptionGroupKind::Size,
        buttons: SizeKey::ALL
            .iter()
            .map(|size| button(size.key(), *size == selection.size))
            .collect(),
    }
}

/// Snapshot of everything the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub prompt: String,
    pub submit_enabled: bool,
    pub loader_visible: bool,
    pub empty_state_visible: bool,
    pub result_visible: bool,
    pub result_faded_in: bool,
    pub image_src: Option<String>,
    pub styles: OptionGroup,
    pub sizes: OptionGroup,
    pub toast: Option<Toast>,
}

impl PageView {
    /// Plain or colored text rendering for the terminal front end.
    pub fn to_terminal(&self, colors: bool) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Style  {}", render_group(&self.styles, colors));
        let _ = writeln!(out, "Size   {}", render_group(&self.sizes, colors));
        let _ = writeln!(out, "Prompt {}", self.prompt_line());

        let status = if self.loader_visible {
            "⏳ generating...".to_string()
        } else if self.result_visible {
            match &self.image_src {
                Some(src) => format!("🖼  {}", src),
                None => "🖼  (no source)".to_string(),
            }
        } else {
            "(no image yet)".to_string()
        };
        let _ = writeln!(out, "Result {}", status);

        if let Some(toast) = &self.toast {
            let line = format!("{} {}", toast.kind.icon(), toast.message);
            if colors {
                let _ = writeln!(out, "{}", line.color(toast.kind.color()).bold());
            } else {
                let _ = writeln!(out, "{}", line);
            }
        }

        out
    }

    fn prompt_line(&self) -> String {
        if self.prompt.is_empty() {
            "(empty)".to_string()
        } else {
            format!("\"{}\"", self.prompt)
        }
    }
}

fn render_group(group: &OptionGroup, colors: bool) -> String {
    group
        .buttons
        .iter()
        .map(|button| match (button.active, colors) {
            (true, true) => format!("[{}]", button.label).black().on_white().bold().to_string(),
            (true, false) => format!("[{}]", button.label),
            (false, true) => format!(" {} ", button.label).bright_black().to_string(),
            (false, false) => format!(" {} ", button.label),
        })
        .collect::<Vec<_>>()
        .join("")
}
