use std::path::PathBuf;

use widget_core::{
    update, Effect, Msg, ObjectUrl, Progress, ResultImage, SelectedFile, UploadStatus,
    WidgetState,
};

fn image(name: &str) -> SelectedFile {
    SelectedFile {
        name: name.to_string(),
        content_type: "image/png".to_string(),
        byte_len: None,
        path: PathBuf::from(name),
    }
}

fn result(url: &str) -> ResultImage {
    ResultImage {
        url: ObjectUrl::new(url),
        byte_len: 3,
        content_type: None,
        received_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[test]
fn reselection_supersedes_in_flight_session() {
    let (state, _) = update(WidgetState::new(), Msg::FilesSelected(vec![image("a.png")]));

    let (state, effects) = update(state, Msg::FilesSelected(vec![image("b.png")]));

    assert_eq!(
        effects,
        vec![
            Effect::CancelUpload { session_id: 1 },
            Effect::StartUpload {
                session_id: 2,
                file: image("b.png"),
            },
        ]
    );
    assert_eq!(state.session().map(|s| s.id), Some(2));
}

#[test]
fn late_success_of_superseded_session_is_discarded() {
    let (state, _) = update(WidgetState::new(), Msg::FilesSelected(vec![image("a.png")]));
    let (state, _) = update(state, Msg::FilesSelected(vec![image("b.png")]));
    let before = state.view();

    let (mut state, effects) = update(
        state,
        Msg::UploadSucceeded {
            session_id: 1,
            result: result("blob:widget/1"),
        },
    );

    // The stale blob is released instead of being displayed.
    assert_eq!(
        effects,
        vec![Effect::ReleaseObjectUrl {
            url: ObjectUrl::new("blob:widget/1"),
        }]
    );
    let view = state.view();
    assert_eq!(view.status, UploadStatus::Uploading);
    assert_eq!(view.file_name.as_deref(), Some("b.png"));
    assert!(view.result.is_none());
    assert_eq!(view, before);
    assert!(state.consume_dirty());
}

#[test]
fn late_failure_and_progress_of_superseded_session_are_ignored() {
    let (state, _) = update(WidgetState::new(), Msg::FilesSelected(vec![image("a.png")]));
    let (state, _) = update(state, Msg::FilesSelected(vec![image("b.png")]));
    let (state, _) = update(
        state,
        Msg::UploadProgress {
            session_id: 2,
            loaded: 1,
            total: Some(4),
        },
    );

    let (state, _) = update(
        state,
        Msg::UploadProgress {
            session_id: 1,
            loaded: 4,
            total: Some(4),
        },
    );
    let (state, _) = update(
        state,
        Msg::UploadFailed {
            session_id: 1,
            reason: "network error".to_string(),
        },
    );

    let view = state.view();
    assert_eq!(view.status, UploadStatus::Uploading);
    assert_eq!(view.progress, Progress::Percent(25));
    assert_eq!(view.last_error, None);
}

#[test]
fn new_session_succeeds_after_stale_completion() {
    let (state, _) = update(WidgetState::new(), Msg::FilesSelected(vec![image("a.png")]));
    let (state, _) = update(state, Msg::FilesSelected(vec![image("b.png")]));
    let (state, _) = update(
        state,
        Msg::UploadSucceeded {
            session_id: 1,
            result: result("blob:widget/1"),
        },
    );

    let (state, effects) = update(
        state,
        Msg::UploadSucceeded {
            session_id: 2,
            result: result("blob:widget/2"),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.status(), UploadStatus::Succeeded);
    assert_eq!(
        state.result().map(|r| r.url.clone()),
        Some(ObjectUrl::new("blob:widget/2"))
    );
}

#[test]
fn session_ids_are_monotonic_across_rejections() {
    let (state, _) = update(WidgetState::new(), Msg::FilesSelected(vec![image("a.png")]));
    let rejected = SelectedFile {
        content_type: "application/zip".to_string(),
        ..image("c.zip")
    };
    let (state, _) = update(state, Msg::FilesSelected(vec![rejected]));
    // A rejected pick leaves the running upload alone.
    assert_eq!(state.session().map(|s| s.id), Some(1));
    assert_eq!(state.status(), UploadStatus::Uploading);

    let (state, _) = update(
        state,
        Msg::UploadFailed {
            session_id: 1,
            reason: "x".to_string(),
        },
    );
    let (_state, effects) = update(state, Msg::FilesSelected(vec![image("d.png")]));
    assert_eq!(
        effects,
        vec![Effect::StartUpload {
            session_id: 2,
            file: image("d.png"),
        }]
    );
}
