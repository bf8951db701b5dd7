use colored::Color;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✕",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Default)]
struct ToastSlot {
    toast: Option<Toast>,
    visible: bool,
    epoch: u64,
}

/// Single toast surface. A newer toast replaces the visible one and owns the hide timer.
#[derive(Debug, Clone)]
pub struct Toaster {
    slot: Arc<Mutex<ToastSlot>>,
    duration: Duration,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Toaster {
    pub fn new() -> Self {
        Self::with_duration(TOAST_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(ToastSlot::default())),
            duration,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ToastSlot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn notify(&self, message: impl Into<String>, kind: ToastKind) {
        let toast = Toast {
            kind,
            message: message.into(),
        };
        log::debug!("Toast {} {}", kind.icon(), toast.message);

        let epoch = {
            let mut slot = self.lock();
            slot.toast = Some(toast);
            slot.visible = true;
            slot.epoch += 1;
            slot.epoch
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let toaster = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(toaster.duration).await;
                    toaster.hide_if_current(epoch);
                });
            }
            Err(_) => log::warn!("No runtime to schedule toast dismissal, toast stays visible"),
        }
    }

    fn hide_if_current(&self, epoch: u64) {
        let mut slot = self.lock();
        if slot.epoch == epoch {
            slot.visible = false;
        }
    }

    pub fn hide(&self) {
        let mut slot = self.lock();
        slot.visible = false;
        slot.epoch += 1;
    }

    /// The toast on screen right now, if any.
    pub fn visible(&self) -> Option<Toast> {
        let slot = self.lock();
        if slot.visible {
            slot.toast.clone()
        } else {
            None
        }
    }

    /// The most recent toast, shown or not.
    pub fn last(&self) -> Option<Toast> {
        self.lock().toast.clone()
    }
}
