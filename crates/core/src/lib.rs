mod config;
mod error;
mod extension;
mod generator;
mod log_sink;
mod options;
mod pattern;
mod renamer;
mod sanitize;
mod validate;

pub use config::{app_paths, load_config_from, AppConfig, AppPaths};
pub use error::RenameError;
pub use extension::{matches_filter, normalize_extension, normalize_filter, split_name};
pub use generator::{generate_name, number_width, NameGenerator};
pub use log_sink::{FacadeSink, LogSink};
pub use options::RenameOptions;
pub use pattern::{
    parse_pattern, render_pattern, validate_pattern, PatternContext, PatternError, PatternPart,
    Token,
};
pub use renamer::{BatchRenamer, RenameResult};
pub use sanitize::sanitize_filename;
pub use validate::{check_target, TargetCheck};
