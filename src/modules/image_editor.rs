mod ie_helpers;
mod ie_history;
mod ie_main;
mod ie_selection;
mod ie_session;
mod ie_tools;
mod ie_ui;

pub use ie_main::ImageEditor;
pub use ie_session::Command;
