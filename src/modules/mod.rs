pub mod image_editor;
pub mod image_export;
