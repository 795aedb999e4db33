//! Native dialogs via rfd

use std::path::PathBuf;

use qsp_callbacks::FileRequest;

pub fn message(text: &str) {
    rfd::MessageDialog::new()
        .set_title("Info")
        .set_description(text)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

pub fn choose_file(request: FileRequest) -> Option<PathBuf> {
    let dialog = rfd::FileDialog::new()
        .set_title(request.title())
        .add_filter(request.filter_name(), request.extensions());
    if request.is_save() {
        dialog.save_file()
    } else {
        dialog.pick_file()
    }
}
