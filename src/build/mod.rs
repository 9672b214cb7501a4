//! Client build artifact staging and relocation.

pub mod artifacts;

pub use artifacts::{client_output_dir, move_artifacts, strip_windows_drive, temp_dir_name, OutputMode};
