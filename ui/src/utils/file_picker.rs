//! File picker for choosing photos and videos to upload.
//!
//! The native dialog sits behind a trait so the gallery can be driven in tests without a
//! desktop session.

use std::path::PathBuf;

/// Extensions offered by the dialog. The server decides what it actually accepts.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "heic", "mp4", "mov", "webm", "mkv", "avi",
];

/// Trait for picking files, enabling mock implementations for testing.
pub trait FilePickerHandler {
    /// Lets the user choose any number of files. Empty when the dialog was cancelled.
    fn pick_media_files(&self) -> Vec<PathBuf>;
}

/// Default file picker using the system file dialog.
#[derive(Debug, Default)]
pub struct SystemFilePickerHandler;

impl FilePickerHandler for SystemFilePickerHandler {
    fn pick_media_files(&self) -> Vec<PathBuf> {
        let files = rfd::FileDialog::new()
            .add_filter("Photos and videos", MEDIA_EXTENSIONS)
            .set_title("Select photos or videos")
            .pick_files()
            .unwrap_or_default();

        log::info!("FilePicker: user selected {} file(s)", files.len());
        files
    }
}

/// Files dropped onto the window this frame.
pub fn dropped_files(ctx: &egui::Context) -> Vec<PathBuf> {
    ctx.input(|i| {
        i.raw
            .dropped_files
            .iter()
            .filter_map(|file| file.path.clone())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock handler returning a fixed selection.
    struct MockFilePickerHandler {
        files: Vec<PathBuf>,
    }

    impl FilePickerHandler for MockFilePickerHandler {
        fn pick_media_files(&self) -> Vec<PathBuf> {
            self.files.clone()
        }
    }

    #[test]
    fn test_mock_file_picker_cancelled() {
        let handler = MockFilePickerHandler { files: Vec::new() };
        assert!(handler.pick_media_files().is_empty());
    }

    #[test]
    fn test_file_picker_handler_trait_is_object_safe() {
        fn accept(handler: &dyn FilePickerHandler) -> usize {
            handler.pick_media_files().len()
        }
        let handler = MockFilePickerHandler {
            files: vec![PathBuf::from("a.jpg"), PathBuf::from("b.mp4")],
        };
        assert_eq!(accept(&handler), 2);
    }

    #[test]
    fn test_dialog_filter_covers_videos() {
        assert!(MEDIA_EXTENSIONS.contains(&"mp4"));
        assert!(MEDIA_EXTENSIONS.contains(&"png"));
    }

    #[test]
    fn test_no_dropped_files_by_default() {
        let ctx = egui::Context::default();
        assert!(dropped_files(&ctx).is_empty());
    }
}
