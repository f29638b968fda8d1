use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use widget_core::{update, Msg, UploadStatus, WidgetState};
use widget_engine::{select_file, EngineHandle};
use widget_logging::{widget_info, widget_warn};

use super::config::WidgetConfig;
use super::effects::{to_selected_file, EffectRunner};
use super::render;

/// Poll interval while waiting for engine events.
const TICK: Duration = Duration::from_millis(75);
/// How long to keep draining engine events after teardown.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub downloads: Vec<PathBuf>,
    pub failed_downloads: usize,
}

impl RunSummary {
    /// At least one upload went through and nothing failed along the way.
    pub fn is_success(&self) -> bool {
        self.succeeded > 0 && self.failed == 0 && self.failed_downloads == 0
    }
}

pub fn run(config: WidgetConfig, files: &[PathBuf], download: bool) -> anyhow::Result<RunSummary> {
    let settings = config.upload_settings();
    let settle_timeout = settings.connect_timeout + settings.request_timeout + Duration::from_secs(5);
    let engine = EngineHandle::new(settings).context("failed to start upload engine")?;
    let runner = EffectRunner::new(engine, config.output_dir.clone());
    let state = WidgetState::with_accept_filter(config.accept_filter());

    let mut app = App::new(state, runner, settle_timeout);
    let download_name = download.then(|| config.download_filename.clone());
    Ok(app.run_files(files, download_name.as_deref()))
}

pub struct App {
    state: WidgetState,
    runner: EffectRunner,
    settle_timeout: Duration,
    print: bool,
    last_frame: Vec<String>,
}

impl App {
    pub fn new(state: WidgetState, runner: EffectRunner, settle_timeout: Duration) -> Self {
        Self {
            state,
            runner,
            settle_timeout,
            print: true,
            last_frame: Vec::new(),
        }
    }

    /// Picks each file in turn, waits for its result and optionally saves it.
    pub fn run_files(&mut self, files: &[PathBuf], download_name: Option<&str>) -> RunSummary {
        let mut summary = RunSummary::default();
        for path in files {
            match self.upload_one(path) {
                Some(UploadStatus::Succeeded) => {
                    summary.succeeded += 1;
                    if let Some(filename) = download_name {
                        self.dispatch(Msg::DownloadClicked {
                            filename: filename.to_string(),
                        });
                    }
                }
                Some(_) => summary.failed += 1,
                None => summary.skipped += 1,
            }
        }
        self.shutdown();
        summary.downloads = self.runner.take_downloads();
        summary.failed_downloads = self.runner.take_failed_downloads();
        summary
    }

    /// `None` when the file never started uploading.
    fn upload_one(&mut self, path: &Path) -> Option<UploadStatus> {
        let info = match select_file(path) {
            Ok(info) => info,
            Err(err) => {
                widget_warn!("{}", err);
                return None;
            }
        };
        self.dispatch(Msg::FilesSelected(vec![to_selected_file(info)]));
        if self.state.status() != UploadStatus::Uploading {
            return None;
        }
        Some(self.settle())
    }

    fn settle(&mut self) -> UploadStatus {
        let deadline = Instant::now() + self.settle_timeout;
        while self.state.status() == UploadStatus::Uploading {
            if Instant::now() >= deadline {
                widget_warn!(
                    "Upload still running after {:?}; cancelling",
                    self.settle_timeout
                );
                self.dispatch(Msg::CancelClicked);
                break;
            }
            let msg = self.runner.next_msg(TICK).unwrap_or(Msg::Tick);
            self.dispatch(msg);
        }
        self.state.status()
    }

    fn shutdown(&mut self) {
        self.dispatch(Msg::Teardown);
        while let Some(msg) = self.runner.next_msg(SHUTDOWN_GRACE) {
            self.dispatch(msg);
        }
        let leaked = self.runner.live_urls();
        if leaked > 0 {
            widget_warn!("{} object urls still live after teardown", leaked);
        } else {
            widget_info!("Widget torn down");
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.run(effects);
        if was_dirty {
            self.render();
        }
    }

    fn render(&mut self) {
        let frame = render::render(&self.state.view());
        if frame != self.last_frame {
            if self.print {
                for line in &frame {
                    println!("{line}");
                }
            }
            self.last_frame = frame;
        }
    }
}
