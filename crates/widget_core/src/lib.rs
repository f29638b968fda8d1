//! Upload widget core: pure state machine and view-model helpers.
mod accept;
mod effect;
mod msg;
mod progress;
mod state;
mod update;
mod view_model;

pub use accept::AcceptFilter;
pub use effect::Effect;
pub use msg::Msg;
pub use progress::{percent, Progress};
pub use state::{
    ObjectUrl, ResultImage, SelectedFile, SessionId, UploadSession, UploadStatus, WidgetState,
};
pub use update::update;
pub use view_model::{ResultView, WidgetViewModel, DEFAULT_DOWNLOAD_FILENAME};
