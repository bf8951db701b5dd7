use crate::{
    config::Config,
    deepimg::ImageBackend,
    error::{KuronekoError, Result},
    models::{LoadedImage, SizeKey, Style},
    ui::{
        selection::Selection,
        toast::{ToastKind, Toaster},
        view::{render_sizes, render_styles, OptionGroup, PageView},
    },
};
use chrono::{DateTime, Utc};
use futures::future::{abortable, AbortHandle};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub const EMPTY_PROMPT_MESSAGE: &str = "Prompt cannot be empty!";
pub const SUCCESS_MESSAGE: &str = "Successfully created image!";
pub const FADE_IN_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Prompt was blank; nothing was sent.
    EmptyPrompt,
    Succeeded { url: String },
    Failed { message: String },
    /// A newer submission, a reset or disposal took over before this one finished.
    Cancelled,
}

#[derive(Debug)]
struct UiState {
    selection: Selection,
    prompt: String,
    phase: Phase,
    submit_enabled: bool,
    loader_visible: bool,
    empty_state_visible: bool,
    result_visible: bool,
    result_faded_in: bool,
    image_src: Option<String>,
    image: Option<LoadedImage>,
    styles: OptionGroup,
    sizes: OptionGroup,
}

impl UiState {
    fn new() -> Self {
        let selection = Selection::new();
        Self {
            styles: render_styles(&selection),
            sizes: render_sizes(&selection),
            selection,
            prompt: String::new(),
            phase: Phase::Idle,
            submit_enabled: true,
            loader_visible: false,
            empty_state_visible: true,
            result_visible: false,
            result_faded_in: false,
            image_src: None,
            image: None,
        }
    }

    fn reset(&mut self) {
        self.selection.reset();
        self.styles = render_styles(&self.selection);
        self.sizes = render_sizes(&self.selection);
        self.prompt.clear();
        self.phase = Phase::Idle;
        self.submit_enabled = true;
        self.loader_visible = false;
        self.empty_state_visible = true;
        self.result_visible = false;
        self.result_faded_in = false;
        self.image_src = None;
        self.image = None;
    }

    fn begin_loading(&mut self) {
        self.phase = Phase::Loading;
        self.submit_enabled = false;
        self.loader_visible = true;
    }

    fn show_result(&mut self, image: LoadedImage) {
        self.image_src = Some(image.url.clone());
        self.image = Some(image);
        self.empty_state_visible = false;
        self.result_visible = true;
        self.result_faded_in = false;
        self.loader_visible = false;
        self.submit_enabled = true;
        self.phase = Phase::Success;
    }

    fn show_failure(&mut self) {
        // the result area keeps whatever it showed before this submission
        self.image_src = self.image.as_ref().map(|image| image.url.clone());
        self.loader_visible = false;
        self.submit_enabled = true;
        self.phase = Phase::Failure;
    }
}

#[derive(Debug, Default)]
struct InFlight {
    id: u64,
    abort: Option<AbortHandle>,
}

impl InFlight {
    /// Aborts whatever is running and invalidates its id.
    fn cancel(&mut self) -> u64 {
        if let Some(handle) = self.abort.take() {
            handle.abort();
        }
        self.id += 1;
        self.id
    }
}

/// Drives the page: selection, submission, result display and toasts.
pub struct UiController {
    backend: Arc<dyn ImageBackend>,
    toaster: Toaster,
    product_name: String,
    // lock order: in_flight before state
    in_flight: Mutex<InFlight>,
    state: Mutex<UiState>,
}

impl UiController {
    pub fn new(backend: Arc<dyn ImageBackend>, config: &Config) -> Self {
        Self::with_toaster(backend, config, Toaster::new())
    }

    pub fn with_toaster(backend: Arc<dyn ImageBackend>, config: &Config, toaster: Toaster) -> Self {
        Self {
            backend,
            toaster,
            product_name: config.product_name.clone(),
            in_flight: Mutex::new(InFlight::default()),
            state: Mutex::new(UiState::new()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, UiState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, InFlight> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.lock_state().prompt = prompt.into();
    }

    pub fn selection(&self) -> Selection {
        self.lock_state().selection
    }

    pub fn phase(&self) -> Phase {
        self.lock_state().phase
    }

    pub fn view(&self) -> PageView {
        let state = self.lock_state();
        PageView {
            prompt: state.prompt.clone(),
            submit_enabled: state.submit_enabled,
            loader_visible: state.loader_visible,
            empty_state_visible: state.empty_state_visible,
            result_visible: state.result_visible,
            result_faded_in: state.result_faded_in,
            image_src: state.image_src.clone(),
            styles: state.styles.clone(),
            sizes: state.sizes.clone(),
            toast: self.toaster.visible(),
        }
    }

    pub fn select_style(&self, style: Style) {
        let mut state = self.lock_state();
        state.selection.select_style(style);
        state.styles = render_styles(&state.selection);
        log::debug!("Style -> {}", style);
    }

    pub fn select_size(&self, size: SizeKey) {
        let mut state = self.lock_state();
        state.selection.select_size(size);
        state.sizes = render_sizes(&state.selection);
        log::debug!("Size -> {}", size);
    }

    pub fn select_style_tag(&self, tag: &str) -> Result<Style> {
        let style: Style = tag.parse()?;
        self.select_style(style);
        Ok(style)
    }

    pub fn select_size_key(&self, key: &str) -> Result<SizeKey> {
        let size: SizeKey = key.parse()?;
        self.select_size(size);
        Ok(size)
    }

    /// Handles a press of the generate button.
    pub async fn submit(&self) -> SubmitOutcome {
        let (prompt, selection) = {
            let state = self.lock_state();
            (state.prompt.trim().to_string(), state.selection)
        };

        if prompt.is_empty() {
            log::warn!("Submit ignored: empty prompt");
            self.toaster.notify(EMPTY_PROMPT_MESSAGE, ToastKind::Error);
            return SubmitOutcome::EmptyPrompt;
        }

        let id = {
            let mut in_flight = self.lock_in_flight();
            if in_flight.abort.is_some() {
                log::info!("Superseding in-flight request");
            }
            let id = in_flight.cancel();
            self.lock_state().begin_loading();
            id
        };

        let generation = self.backend.generate(
            &prompt,
            selection.style.tag(),
            selection.size.key(),
        );
        let url = match self.run_current(id, generation).await {
            Some(Ok(url)) => url,
            Some(Err(e)) => return self.fail(id, e),
            None => return SubmitOutcome::Cancelled,
        };

        if !self.update_current(id, |state| state.image_src = Some(url.clone())) {
            return SubmitOutcome::Cancelled;
        }

        let image = match self.run_current(id, self.backend.load_image(&url)).await {
            Some(Ok(image)) => image,
            Some(Err(e)) => return self.fail(id, e),
            None => return SubmitOutcome::Cancelled,
        };

        if !self.update_current(id, |state| state.show_result(image)) {
            return SubmitOutcome::Cancelled;
        }
        self.toaster.notify(SUCCESS_MESSAGE, ToastKind::Success);
        self.finish(id);

        tokio::time::sleep(FADE_IN_DELAY).await;
        self.update_current(id, |state| state.result_faded_in = true);

        SubmitOutcome::Succeeded { url }
    }

    /// Runs `fut` as request `id`, or returns `None` if that request is no longer current.
    async fn run_current<F: Future>(&self, id: u64, fut: F) -> Option<F::Output> {
        let (fut, handle) = abortable(fut);
        {
            let mut in_flight = self.lock_in_flight();
            if in_flight.id != id {
                return None;
            }
            in_flight.abort = Some(handle);
        }
        fut.await.ok()
    }

    /// Applies `apply` only while request `id` still owns the page.
    fn update_current(&self, id: u64, apply: impl FnOnce(&mut UiState)) -> bool {
        let in_flight = self.lock_in_flight();
        if in_flight.id != id {
            return false;
        }
        apply(&mut *self.lock_state());
        true
    }

    fn finish(&self, id: u64) {
        let mut in_flight = self.lock_in_flight();
        if in_flight.id == id {
            in_flight.abort = None;
        }
    }

    fn fail(&self, id: u64, error: KuronekoError) -> SubmitOutcome {
        let message = error.user_message();
        if !self.update_current(id, UiState::show_failure) {
            return SubmitOutcome::Cancelled;
        }
        log::error!("Generation failed: {}", message);
        self.toaster.notify(message.clone(), ToastKind::Error);
        self.finish(id);
        SubmitOutcome::Failed { message }
    }

    /// Back to the initial page: defaults, empty prompt, no result.
    pub fn reset(&self) {
        let mut in_flight = self.lock_in_flight();
        in_flight.cancel();

        self.lock_state().reset();
        log::info!("Page reset");
    }

    /// Aborts in-flight work; called when the page goes away.
    pub fn dispose(&self) {
        let mut in_flight = self.lock_in_flight();
        if in_flight.abort.is_some() {
            log::debug!("Disposing controller with a request in flight");
        }
        in_flight.cancel();
    }

    /// Saves the displayed image into `dir`. Does nothing when no image is shown.
    pub async fn download(&self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let (image, style) = {
            let state = self.lock_state();
            (state.image.clone(), state.selection.style)
        };
        let Some(image) = image else {
            log::debug!("Nothing to download");
            return Ok(None);
        };

        let path = dir
            .as_ref()
            .join(download_file_name(&self.product_name, style, Utc::now()));
        tokio::fs::write(&path, &image.bytes).await?;

        log::info!("💾 Saved {} ({} bytes)", path.display(), image.len());
        Ok(Some(path))
    }
}

impl Drop for UiController {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// `<product>-<style>-<unix millis>.png`
pub fn download_file_name(product: &str, style: Style, at: DateTime<Utc>) -> String {
    format!("{}-{}-{}.png", product, style.tag(), at.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Script {
        Url(&'static str),
        Status(u16),
        MissingUrl,
        Hang,
    }

    struct FakeBackend {
        script: Mutex<VecDeque<Script>>,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, String, String)>>,
    }

    impl FakeBackend {
        fn new(script: Vec<Script>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageBackend for FakeBackend {
        async fn generate(&self, prompt: &str, style: &str, size_key: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), style.to_string(), size_key.to_string()));
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Script::Url(url)) => Ok(url.to_string()),
                Some(Script::Status(status)) => Err(KuronekoError::Http { status }),
                Some(Script::MissingUrl) => Err(KuronekoError::MissingImageUrl),
                Some(Script::Hang) => futures::future::pending().await,
                None => Err(KuronekoError::Network("connection refused".into())),
            }
        }

        async fn load_image(&self, url: &str) -> Result<LoadedImage> {
            if url == "broken" {
                return Err(KuronekoError::Http { status: 404 });
            }
            Ok(LoadedImage {
                url: url.to_string(),
                content_type: Some("image/png".into()),
                bytes: b"png-bytes".to_vec(),
            })
        }
    }

    fn controller(backend: Arc<FakeBackend>) -> Arc<UiController> {
        Arc::new(UiController::new(backend, &Config::new()))
    }

    #[tokio::test]
    async fn starts_idle_with_defaults() {
        let ui = controller(FakeBackend::new(vec![]));
        let view = ui.view();
        assert_eq!(ui.phase(), Phase::Idle);
        assert!(view.submit_enabled);
        assert!(view.empty_state_visible);
        assert!(!view.result_visible);
        assert_eq!(view.styles.active().map(|b| b.value), Some("default"));
        assert_eq!(view.sizes.active().map(|b| b.value), Some("1:1"));
    }

    #[tokio::test]
    async fn selecting_redraws_the_group() {
        let ui = controller(FakeBackend::new(vec![]));
        ui.select_style(Style::Ghibli);
        ui.select_size(SizeKey::Landscape);

        let view = ui.view();
        assert_eq!(view.styles.active_count(), 1);
        assert_eq!(view.styles.active().map(|b| b.value), Some("ghibli"));
        assert_eq!(view.sizes.active().map(|b| b.value), Some("3:2"));
    }

    #[tokio::test]
    async fn unknown_tags_are_rejected_without_change() {
        let ui = controller(FakeBackend::new(vec![]));
        assert!(ui.select_style_tag("watercolor").is_err());
        assert!(ui.select_size_key("16:9").is_err());
        assert_eq!(ui.selection(), Selection::default());

        assert_eq!(ui.select_style_tag("oil painting").unwrap(), Style::OilPainting);
    }

    #[tokio::test]
    async fn blank_prompt_never_calls_the_api() {
        let backend = FakeBackend::new(vec![Script::Url("X")]);
        let ui = controller(backend.clone());

        for prompt in ["", "   ", "\n\t"] {
            ui.set_prompt(prompt);
            assert_eq!(ui.submit().await, SubmitOutcome::EmptyPrompt);
            let toast = ui.toaster().visible().expect("error toast");
            assert_eq!(toast.kind, ToastKind::Error);
            assert_eq!(toast.message, EMPTY_PROMPT_MESSAGE);
        }
        assert_eq!(backend.calls(), 0);
        assert_eq!(ui.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn success_shows_image_and_toast() {
        let backend = FakeBackend::new(vec![Script::Url("X")]);
        let ui = controller(backend.clone());
        ui.select_style(Style::Ghibli);
        ui.select_size(SizeKey::Portrait);
        ui.set_prompt("  a cat ");

        let outcome = ui.submit().await;
        assert_eq!(outcome, SubmitOutcome::Succeeded { url: "X".into() });

        let view = ui.view();
        assert_eq!(view.image_src.as_deref(), Some("X"));
        assert!(view.result_visible);
        assert!(view.result_faded_in);
        assert!(!view.empty_state_visible);
        assert!(!view.loader_visible);
        assert!(view.submit_enabled);
        assert_eq!(ui.phase(), Phase::Success);

        let toast = view.toast.expect("success toast");
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, SUCCESS_MESSAGE);

        let seen = backend.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![("a cat".to_string(), "ghibli".to_string(), "2:3".to_string())]
        );
    }

    #[tokio::test]
    async fn http_failure_reports_status_and_reenables_submit() {
        let ui = controller(FakeBackend::new(vec![Script::Status(500)]));
        ui.set_prompt("a cat");

        let outcome = ui.submit().await;
        assert!(matches!(&outcome, SubmitOutcome::Failed { message } if message.contains("500")));

        let view = ui.view();
        assert!(view.submit_enabled);
        assert!(!view.loader_visible);
        assert!(!view.result_visible);
        assert_eq!(ui.phase(), Phase::Failure);

        let toast = view.toast.expect("error toast");
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.message.contains("500"));
    }

    #[tokio::test]
    async fn missing_url_is_a_clean_failure() {
        let ui = controller(FakeBackend::new(vec![Script::MissingUrl]));
        ui.set_prompt("a cat");

        let outcome = ui.submit().await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: "Failed to get image URL".into()
            }
        );
        assert!(ui.view().submit_enabled);
    }

    #[tokio::test]
    async fn failure_keeps_previous_result() {
        let ui = controller(FakeBackend::new(vec![Script::Url("first"), Script::Url("broken")]));
        ui.set_prompt("a cat");
        ui.submit().await;

        let outcome = ui.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Failed { .. }));

        let view = ui.view();
        assert!(view.result_visible);
        assert_eq!(view.image_src.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn new_submission_supersedes_the_old_one() {
        let backend = FakeBackend::new(vec![Script::Hang, Script::Url("second")]);
        let ui = controller(backend.clone());
        ui.set_prompt("a cat");

        let first = tokio::spawn({
            let ui = Arc::clone(&ui);
            async move { ui.submit().await }
        });
        while backend.calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(ui.view().loader_visible);
        assert!(!ui.view().submit_enabled);

        let second = ui.submit().await;
        assert_eq!(second, SubmitOutcome::Succeeded { url: "second".into() });
        assert_eq!(first.await.unwrap(), SubmitOutcome::Cancelled);
        assert_eq!(ui.view().image_src.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn dispose_cancels_in_flight_request() {
        let backend = FakeBackend::new(vec![Script::Hang]);
        let ui = controller(backend.clone());
        ui.set_prompt("a cat");

        let pending = tokio::spawn({
            let ui = Arc::clone(&ui);
            async move { ui.submit().await }
        });
        while backend.calls() == 0 {
            tokio::task::yield_now().await;
        }

        ui.dispose();
        assert_eq!(pending.await.unwrap(), SubmitOutcome::Cancelled);
    }

    #[tokio::test]
    async fn reset_restores_initial_page() {
        let ui = controller(FakeBackend::new(vec![Script::Url("X")]));
        ui.select_style(Style::Anime);
        ui.select_size(SizeKey::Landscape);
        ui.set_prompt("a cat");
        ui.submit().await;

        ui.reset();

        let view = ui.view();
        let selection = ui.selection();
        assert_eq!(selection.style.tag(), "default");
        assert_eq!(selection.size.key(), "1:1");
        assert_eq!(view.prompt, "");
        assert!(!view.result_visible);
        assert!(!view.result_faded_in);
        assert!(view.empty_state_visible);
        assert_eq!(view.styles.active().map(|b| b.value), Some("default"));
        assert_eq!(ui.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn reset_cancels_in_flight_request() {
        let backend = FakeBackend::new(vec![Script::Hang]);
        let ui = controller(backend.clone());
        ui.select_style(Style::Chibi);
        ui.set_prompt("a cat");

        let pending = tokio::spawn({
            let ui = Arc::clone(&ui);
            async move { ui.submit().await }
        });
        while backend.calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(ui.view().loader_visible);

        ui.reset();
        assert_eq!(pending.await.unwrap(), SubmitOutcome::Cancelled);

        let view = ui.view();
        assert!(view.submit_enabled);
        assert!(!view.loader_visible);
        assert!(!view.result_visible);
        assert_eq!(view.prompt, "");
        assert_eq!(ui.phase(), Phase::Idle);
        assert_eq!(ui.selection(), Selection::default());
    }

    #[tokio::test]
    async fn download_writes_named_png() {
        let dir = tempfile::tempdir().unwrap();
        let ui = controller(FakeBackend::new(vec![Script::Url("X")]));

        assert_eq!(ui.download(dir.path()).await.unwrap(), None);

        ui.set_prompt("a cat");
        ui.select_style(Style::Cyberpunk);
        ui.submit().await;

        let path = ui.download(dir.path()).await.unwrap().expect("file written");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("kuroneko-cyberpunk-"), "{}", name);
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
    }

    #[test]
    fn file_name_uses_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            download_file_name("kuroneko", Style::ThreeD, at),
            "kuroneko-3d-1700000000123.png"
        );
    }
}
