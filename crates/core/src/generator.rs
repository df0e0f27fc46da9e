use crate::extension::split_name;
use crate::log_sink::LogSink;
use crate::options::RenameOptions;
use crate::pattern::{parse_pattern, render_pattern, PatternContext, PatternError, PatternPart};
use crate::sanitize::sanitize_filename;
use log::Level;

/// Derives new file names from the original name and its position in the
/// batch. Never touches the filesystem.
#[derive(Debug, Clone)]
pub struct NameGenerator<'a> {
    options: &'a RenameOptions,
    pattern: Option<Result<Vec<PatternPart>, PatternError>>,
}

impl<'a> NameGenerator<'a> {
    pub fn new(options: &'a RenameOptions) -> Self {
        let pattern = options.pattern.as_deref().map(parse_pattern);
        Self { options, pattern }
    }

    /// `index` is zero-based. A pattern that fails to render is logged and
    /// this one name falls back to the prefix/number/suffix rule.
    pub fn generate(
        &self,
        original_name: &str,
        index: usize,
        total: usize,
        log: &dyn LogSink,
    ) -> String {
        let (stem, extension) = split_name(original_name);

        if let Some(parsed) = &self.pattern {
            let ctx = PatternContext {
                index,
                original: stem,
                total,
            };
            let rendered = parsed
                .as_ref()
                .map_err(|err| err.clone())
                .and_then(|parts| render_pattern(parts, &ctx));
            match rendered {
                Ok(rendered) => return self.finish(rendered, extension),
                Err(err) => log.emit(
                    Level::Warn,
                    &format!("Pattern error: {err}. Using default naming."),
                ),
            }
        }

        let mut new_stem = String::with_capacity(original_name.len() + 16);
        new_stem.push_str(&self.options.prefix);
        new_stem.push_str(stem);
        if self.options.add_number {
            let width = number_width(total);
            new_stem.push_str(&format!("_{:0width$}", index + 1));
        }
        new_stem.push_str(&self.options.suffix);

        self.finish(new_stem, extension)
    }

    fn finish(&self, stem: String, original_extension: &str) -> String {
        let stem = if self.options.sanitize {
            sanitize_filename(&stem)
        } else {
            stem
        };
        match &self.options.new_extension {
            Some(ext) => format!("{stem}.{ext}"),
            None => format!("{stem}{original_extension}"),
        }
    }
}

/// One-shot form of [`NameGenerator::generate`].
pub fn generate_name(
    original_name: &str,
    index: usize,
    total: usize,
    options: &RenameOptions,
    log: &dyn LogSink,
) -> String {
    NameGenerator::new(options).generate(original_name, index, total, log)
}

/// Decimal digits in `total`, at least one.
pub fn number_width(total: usize) -> usize {
    total.to_string().len()
}
