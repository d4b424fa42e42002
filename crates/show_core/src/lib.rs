//! ImageShow Core
//!
//! This crate contains:
//! - Command template substitution and quote-aware tokenizing
//! - Argument vector construction
//! - Viewer discovery
//! - Configuration
//! - Temporary image files
//! - Process launching
//! - Error types

pub mod template;
pub mod tokenize;
pub mod command;
pub mod discovery;
pub mod config;
pub mod temp_file;
pub mod launch;
pub mod viewer;
pub mod error;

pub use template::{substitute, Substitution, SubstitutionContext};
pub use tokenize::{tokenize, unquote};
pub use command::{build, build_command};
pub use discovery::{default_executable_names, default_search_path, find_viewing_application, is_fiji};
pub use config::ViewerConfig;
pub use temp_file::{double_backslashes, format_file_name, write_image, TempImage, TempNamer};
pub use launch::{LaunchOutcome, ProcessLauncher, SystemLauncher};
pub use viewer::{is_color_image, ImageViewer, ShowOutcome};
pub use error::{Result, ViewerError};
