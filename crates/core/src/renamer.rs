use crate::error::RenameError;
use crate::extension::matches_filter;
use crate::generator::NameGenerator;
use crate::log_sink::LogSink;
use crate::options::RenameOptions;
use anyhow::{bail, Context, Result};
use log::Level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::atomic::{AtomicBool, Ordering};
use walkdir::WalkDir;

/// Aggregate counts for one run. `renamed + skipped + errors == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameResult {
    pub total: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl RenameResult {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }

    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Renamed => self.renamed += 1,
            FileOutcome::Unchanged | FileOutcome::Collision => self.skipped += 1,
            FileOutcome::Failed => self.errors += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    /// Renamed on disk, or would be in a dry run.
    Renamed,
    Unchanged,
    Collision,
    Failed,
}

pub struct BatchRenamer<'a> {
    options: &'a RenameOptions,
    log: &'a dyn LogSink,
    interrupt: Option<&'a AtomicBool>,
}

impl<'a> BatchRenamer<'a> {
    pub fn new(options: &'a RenameOptions, log: &'a dyn LogSink) -> Self {
        Self {
            options,
            log,
            interrupt: None,
        }
    }

    /// The flag is polled before each file; once set the batch stops with
    /// [`RenameError::Interrupted`].
    pub fn with_interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn options(&self) -> &RenameOptions {
        self.options
    }

    pub fn rename_files(&self, directory: &Path) -> Result<RenameResult, RenameError> {
        if !directory.is_dir() {
            return Err(RenameError::InvalidTarget(directory.to_path_buf()));
        }

        let files = self.collect_candidates(directory)?;
        if self.interrupted() {
            return Err(RenameError::Interrupted);
        }
        let total = files.len();
        let generator = NameGenerator::new(self.options);
        let mut result = RenameResult {
            total,
            ..RenameResult::default()
        };

        self.log
            .emit(Level::Info, &format!("Total {total} files to process..."));

        for (index, path) in files.iter().enumerate() {
            if self.interrupted() {
                return Err(RenameError::Interrupted);
            }

            let outcome = match self.process_file(&generator, path, index, total) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.log.emit(
                        Level::Error,
                        &format!("Rename failed ({}): {err:#}", display_name(path)),
                    );
                    FileOutcome::Failed
                }
            };
            result.record(outcome);
        }

        if self.interrupted() {
            return Err(RenameError::Interrupted);
        }
        Ok(result)
    }

    /// Regular files under `directory` that pass the extension filter,
    /// sorted by full path. Unreadable subdirectories are skipped with a
    /// warning; an unreadable root is an error.
    pub fn collect_candidates(&self, directory: &Path) -> Result<Vec<PathBuf>, RenameError> {
        let filter = self.options.extension_filter.as_ref();
        let mut out = Vec::new();

        if self.options.recursive {
            for entry in WalkDir::new(directory).min_depth(1).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) if err.depth() > 0 => {
                        self.log
                            .emit(Level::Warn, &format!("Skip unreadable entry: {err}"));
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                };
                let path = entry.path();
                if path.is_file() && matches_filter(path, filter) {
                    out.push(path.to_path_buf());
                }
            }
        } else {
            let read_error = |source: std::io::Error| RenameError::Enumeration {
                path: directory.to_path_buf(),
                source,
            };
            for entry in fs::read_dir(directory).map_err(read_error)? {
                let path = entry.map_err(read_error)?.path();
                if path.is_file() && matches_filter(&path, filter) {
                    out.push(path);
                }
            }
        }

        out.sort();
        Ok(out)
    }

    fn process_file(
        &self,
        generator: &NameGenerator<'_>,
        path: &Path,
        index: usize,
        total: usize,
    ) -> Result<FileOutcome> {
        let name = path
            .file_name()
            .with_context(|| format!("no file name: {}", path.display()))?
            .to_str()
            .with_context(|| format!("file name is not valid UTF-8: {}", path.display()))?;

        let new_name = generator.generate(name, index, total, self.log);
        if new_name == name {
            self.log
                .emit(Level::Debug, &format!("Skip (name unchanged): {name}"));
            return Ok(FileOutcome::Unchanged);
        }

        if new_name.contains(['/', MAIN_SEPARATOR]) {
            bail!("generated name contains a path separator: {new_name}");
        }

        let parent = path
            .parent()
            .with_context(|| format!("no parent directory: {}", path.display()))?;
        let target = parent.join(&new_name);

        if target_exists(&target) {
            self.log
                .emit(Level::Warn, &format!("Skip (target exists): {new_name}"));
            return Ok(FileOutcome::Collision);
        }

        if self.options.dry_run {
            self.log
                .emit(Level::Info, &format!("[Preview] {name} -> {new_name}"));
        } else {
            fs::rename(path, &target).with_context(|| {
                format!("{} -> {}", path.display(), target.display())
            })?;
            self.log
                .emit(Level::Info, &format!("Renamed: {name} -> {new_name}"));
        }

        Ok(FileOutcome::Renamed)
    }

    fn interrupted(&self) -> bool {
        self.interrupt
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

// Dangling symlinks count as existing so they are never replaced.
fn target_exists(target: &Path) -> bool {
    fs::symlink_metadata(target).is_ok()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
