use std::path::PathBuf;

/// Everything an editor command or file operation can report back to the shell.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("no image is loaded")]
    NoImageLoaded,

    #[error("there are no more steps to undo")]
    NoHistory,

    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to save {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported output format \"{0}\" (expected jpg, jpeg or png)")]
    UnsupportedFormat(String),
}

impl EditorError {
    /// Short heading for the notice window.
    pub fn title(&self) -> &'static str {
        match self {
            EditorError::NoImageLoaded => "No Image",
            EditorError::NoHistory => "Undo",
            EditorError::Open { .. } => "Open Failed",
            EditorError::Save { .. } | EditorError::Io { .. } | EditorError::UnsupportedFormat(_) => "Save Failed",
        }
    }
}
