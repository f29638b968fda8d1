use widget_core::{Progress, UploadStatus, WidgetViewModel};

const BAR_WIDTH: usize = 20;

/// Text rendition of the widget, one line per visible element.
pub fn render(view: &WidgetViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let file = view.file_name.as_deref().unwrap_or("-");
    match view.status {
        UploadStatus::Idle => lines.push(format!("[{}] idle", view.button_label())),
        UploadStatus::Uploading => {
            lines.push(format!("uploading {file} {}", progress_bar(view.progress)))
        }
        UploadStatus::Succeeded => lines.push(format!("processed {file}")),
        UploadStatus::Failed => lines.push(format!(
            "upload of {file} failed: {}",
            view.last_error.as_deref().unwrap_or("unknown error")
        )),
    }

    if let Some(rejection) = &view.last_rejection {
        lines.push(format!("skipped: {rejection}"));
    }

    match (&view.result, view.caption(), view.placeholder()) {
        (Some(result), Some(caption), _) => lines.push(format!(
            "{caption}: {} ({} bytes, {})",
            result.url,
            result.byte_len,
            result.content_type.as_deref().unwrap_or("unknown type")
        )),
        (None, _, Some(placeholder)) => lines.push(placeholder.to_string()),
        _ => {}
    }

    lines
}

fn progress_bar(progress: Progress) -> String {
    match progress {
        Progress::Percent(percent) => {
            let filled = usize::from(percent) * BAR_WIDTH / 100;
            format!(
                "[{}{}] {percent:>3}%",
                "#".repeat(filled),
                "-".repeat(BAR_WIDTH - filled)
            )
        }
        Progress::Unknown => format!("[{}] ...", "?".repeat(BAR_WIDTH)),
    }
}
