pub mod controller;
pub mod selection;
pub mod toast;
pub mod view;

pub use controller::{download_file_name, Phase, SubmitOutcome, UiController};
pub use selection::Selection;
pub use toast::{Toast, ToastKind, Toaster};
pub use view::{OptionButton, OptionGroup, OptionGroupKind, PageView};
