use crate::app::{App, Model, ToastLevel};
use crate::session::{Location, SessionError, Storage};

use super::model::FileRequest;
use super::picker::list_directory;

impl App {
    /// Run whatever the last update queued: a file operation against
    /// `storage`, and a fresh picker listing if the picker moved.
    pub(super) fn handle_message_side_effects(&self, model: &mut Model, storage: &mut dyn Storage) {
        run_file_request(model, storage);
        sync_picker_listing(model);
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Open,
    Save,
    SaveAs,
}

impl Operation {
    const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Save => "Save",
            Self::SaveAs => "Save as",
        }
    }

    fn done_message(self, name: &str) -> String {
        match self {
            Self::Open => format!("Opened {name}"),
            Self::Save => format!("Saved {name}"),
            Self::SaveAs => format!("Saved as {name}"),
        }
    }
}

/// Execute the pending file request, if any. Failures are shown in the
/// error dialog; the session is left as the failed operation found it.
pub(super) fn run_file_request(model: &mut Model, storage: &mut dyn Storage) {
    let Some(request) = model.pending_request.take() else {
        return;
    };

    let (operation, result) = match request {
        FileRequest::Load(location) => (
            Operation::Open,
            model.session.load(location, storage, &model.renderer),
        ),
        FileRequest::Save => (Operation::Save, model.session.save(storage)),
        FileRequest::SaveAs(location) => (
            Operation::SaveAs,
            model.session.save_as(location, storage),
        ),
    };

    match result {
        Ok(()) => {
            if matches!(operation, Operation::Open) {
                model.reset_scroll();
            } else {
                model.sync_viewports();
            }
            let message = operation.done_message(model.document_name());
            model.show_toast(ToastLevel::Info, message);
        }
        Err(err) => report_failure(model, operation, &err),
    }
}

fn report_failure(model: &mut Model, operation: Operation, err: &SessionError) {
    tracing::warn!(operation = operation.label(), error = %err, "file operation failed");
    model.show_error(format!("{} failed", operation.label()), err.to_string());
}

/// Load `location` at startup, before the first frame.
pub(super) fn open_initial(model: &mut Model, location: Location, storage: &mut dyn Storage) {
    model.pending_request = Some(FileRequest::Load(location));
    run_file_request(model, storage);
}

/// Refresh the picker listing when its input points at a new directory.
pub(super) fn sync_picker_listing(model: &mut Model) {
    let Some(picker) = model.picker.as_mut() else {
        return;
    };
    if !picker.needs_listing() {
        return;
    }
    let dir = picker.input_dir();
    let entries = list_directory(&dir).unwrap_or_else(|err| {
        tracing::debug!(dir = %dir.display(), error = %err, "picker listing failed");
        Vec::new()
    });
    picker.set_listing(dir, entries);
}
