use crate::{Effect, Msg, Progress, WidgetState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: WidgetState, msg: Msg) -> (WidgetState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(files) => {
            // Only the first file of a selection is uploaded.
            let Some(file) = files.into_iter().next() else {
                return (state, Vec::new());
            };
            if !state.accept_filter().accepts(&file.content_type) {
                state.reject_selection(format!(
                    "{} has unsupported type {}",
                    file.name, file.content_type
                ));
                return (state, Vec::new());
            }

            let superseded = state.uploading_session_id();
            let session_id = state.begin_session(file.name.clone());
            let mut effects = Vec::with_capacity(2);
            if let Some(old) = superseded {
                effects.push(Effect::CancelUpload { session_id: old });
            }
            effects.push(Effect::StartUpload { session_id, file });
            effects
        }
        Msg::UploadProgress {
            session_id,
            loaded,
            total,
        } => {
            if state.uploading_session_id() == Some(session_id) {
                state.apply_progress(Progress::from_bytes(loaded, total));
            }
            Vec::new()
        }
        Msg::UploadSucceeded { session_id, result } => {
            if state.uploading_session_id() != Some(session_id) {
                // Late completion of a superseded or cancelled session.
                vec![Effect::ReleaseObjectUrl { url: result.url }]
            } else {
                match state.apply_success(result) {
                    Some(previous) => vec![Effect::ReleaseObjectUrl { url: previous.url }],
                    None => Vec::new(),
                }
            }
        }
        Msg::UploadFailed { session_id, reason } => {
            if state.uploading_session_id() == Some(session_id) {
                state.apply_failure(reason);
            }
            Vec::new()
        }
        Msg::CancelClicked => match state.uploading_session_id() {
            Some(session_id) => {
                state.cancel_session();
                vec![Effect::CancelUpload { session_id }]
            }
            None => Vec::new(),
        },
        Msg::DownloadClicked { filename } => match state.result() {
            Some(result) => vec![Effect::TriggerDownload {
                url: result.url.clone(),
                filename,
            }],
            None => Vec::new(),
        },
        Msg::Teardown => {
            let mut effects = Vec::with_capacity(2);
            if let Some(session_id) = state.uploading_session_id() {
                effects.push(Effect::CancelUpload { session_id });
            }
            if let Some(result) = state.teardown() {
                effects.push(Effect::ReleaseObjectUrl { url: result.url });
            }
            effects
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
