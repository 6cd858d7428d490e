//! Batch processor that highlights HTML files and directory trees.

use crate::{Splash, SplashError};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use splash_theme::DEFAULT_STYLE;
use std::collections::HashMap;
use std::error::Error as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use walkdir::WalkDir;

/// Options for the processor.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// HTML files, or directories searched for `.html`/`.htm` files.
    pub inputs: Vec<PathBuf>,
    /// Output directory mirroring the inputs (if None, modifies in place).
    pub output_dir: Option<PathBuf>,
    /// Requested style name.
    pub style: String,
    /// Decode HTML entities in code before tokenizing.
    pub unescape: bool,
    /// Whether to show verbose output.
    pub verbose: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_dir: None,
            style: DEFAULT_STYLE.to_string(),
            unescape: false,
            verbose: false,
        }
    }
}

/// Statistics from processing.
#[derive(Debug, Default)]
pub struct ProcessorStats {
    /// Number of HTML files written.
    pub files_processed: usize,
    /// Number of HTML files that could not be transformed.
    pub files_failed: usize,
    /// The files that failed, with their error.
    pub failed_files: Vec<(PathBuf, String)>,
    /// Number of code blocks highlighted.
    pub blocks_highlighted: usize,
    /// Number of code blocks skipped.
    pub blocks_skipped: usize,
    /// Total bytes read from input HTML files.
    pub bytes_input: u64,
    /// Total bytes written to output HTML files.
    pub bytes_output: u64,
    /// Time spent processing HTML files.
    pub process_duration: Duration,
}

impl ProcessorStats {
    /// Calculate HTML inflation ratio (output / input).
    pub fn html_inflation_ratio(&self) -> f64 {
        if self.bytes_input == 0 {
            1.0
        } else {
            self.bytes_output as f64 / self.bytes_input as f64
        }
    }

    /// Calculate HTML inflation percentage ((output - input) / input * 100).
    pub fn html_inflation_percent(&self) -> f64 {
        if self.bytes_input == 0 {
            0.0
        } else {
            (self.bytes_output as f64 - self.bytes_input as f64) / self.bytes_input as f64 * 100.0
        }
    }

    /// Calculate processing throughput in MB/s.
    pub fn throughput_mb_s(&self) -> f64 {
        let secs = self.process_duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            (self.bytes_input as f64 / (1024.0 * 1024.0)) / secs
        }
    }
}

/// One file to transform, and where its result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Job {
    input: PathBuf,
    output: PathBuf,
}

/// Outcome of one successfully transformed file.
struct FileResult {
    highlighted: usize,
    skipped: usize,
    input_size: usize,
    output_size: usize,
}

/// Processor for HTML files.
pub struct Processor {
    options: ProcessOptions,
    splash: Splash,
}

impl Processor {
    /// Create a new processor with the default [`Splash`].
    pub fn new(options: ProcessOptions) -> Self {
        Self::with_splash(options, Splash::new())
    }

    pub fn with_splash(options: ProcessOptions, splash: Splash) -> Self {
        Self { options, splash }
    }

    /// Transform every input file.
    ///
    /// Failing files are reported and counted in the stats; only errors that
    /// prevent finding the inputs are returned.
    pub fn process(&self) -> Result<ProcessorStats, ProcessError> {
        let jobs = self.collect_jobs()?;
        log::debug!("{} HTML files to process", jobs.len());

        // Create progress bar for file processing
        let progress = ProgressBar::new(jobs.len() as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
        ) {
            progress.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }

        let process_start = Instant::now();

        // Atomic counters for parallel aggregation
        let files_processed = AtomicUsize::new(0);
        let blocks_highlighted = AtomicUsize::new(0);
        let blocks_skipped = AtomicUsize::new(0);
        let bytes_input = AtomicUsize::new(0);
        let bytes_output = AtomicUsize::new(0);
        let failed_files = Mutex::new(Vec::<(PathBuf, String)>::new());

        let verbose = self.options.verbose;

        jobs.par_iter().for_each(|job| {
            if verbose {
                progress.println(format!("Processing: {}", job.input.display()));
            }

            match self.process_file(job) {
                Ok(result) => {
                    files_processed.fetch_add(1, Ordering::Relaxed);
                    blocks_highlighted.fetch_add(result.highlighted, Ordering::Relaxed);
                    blocks_skipped.fetch_add(result.skipped, Ordering::Relaxed);
                    bytes_input.fetch_add(result.input_size, Ordering::Relaxed);
                    bytes_output.fetch_add(result.output_size, Ordering::Relaxed);
                }
                Err(e) => {
                    progress.println(format!("Warning: {}", error_chain(&e)));
                    failed_files
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((job.input.clone(), error_chain(&e)));
                }
            }
            progress.inc(1);
        });

        let process_duration = process_start.elapsed();
        progress.finish_and_clear();

        let mut failed_files = failed_files
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        failed_files.sort();

        Ok(ProcessorStats {
            files_processed: files_processed.load(Ordering::Relaxed),
            files_failed: failed_files.len(),
            failed_files,
            blocks_highlighted: blocks_highlighted.load(Ordering::Relaxed),
            blocks_skipped: blocks_skipped.load(Ordering::Relaxed),
            bytes_input: bytes_input.load(Ordering::Relaxed) as u64,
            bytes_output: bytes_output.load(Ordering::Relaxed) as u64,
            process_duration,
        })
    }

    /// Expand the inputs into files, each paired with its output path.
    ///
    /// A file reached through several inputs is processed once. Two
    /// different files mapped to one output path are an error.
    fn collect_jobs(&self) -> Result<Vec<Job>, ProcessError> {
        let mut jobs = Vec::new();
        let mut sources: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut push = |job: Job| match sources.get(&job.output) {
            Some(first) if *first == job.input => Ok(()),
            Some(first) => Err(ProcessError::DuplicateOutput {
                output: job.output.clone(),
                first: first.clone(),
                second: job.input.clone(),
            }),
            None => {
                sources.insert(job.output.clone(), job.input.clone());
                jobs.push(job);
                Ok(())
            }
        };

        for input in &self.options.inputs {
            if input.is_dir() {
                for entry in WalkDir::new(input).sort_by_file_name() {
                    let entry = entry?;
                    if entry.file_type().is_file() && is_html(entry.path()) {
                        let relative = entry.path().strip_prefix(input).unwrap_or(entry.path());
                        push(Job {
                            input: entry.path().to_path_buf(),
                            output: self.output_path(entry.path(), relative),
                        })?;
                    }
                }
            } else if input.is_file() {
                let relative = input.file_name().map_or(input.as_path(), Path::new);
                push(Job {
                    input: input.clone(),
                    output: self.output_path(input, relative),
                })?;
            } else {
                return Err(ProcessError::Io {
                    path: input.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
                });
            }
        }

        Ok(jobs)
    }

    fn output_path(&self, input: &Path, relative: &Path) -> PathBuf {
        match &self.options.output_dir {
            Some(dir) => dir.join(relative),
            None => input.to_path_buf(),
        }
    }

    /// Transform a single file. Nothing is written unless the whole document
    /// was transformed.
    fn process_file(&self, job: &Job) -> Result<FileResult, ProcessError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| ProcessError::Io { path, source }
        };

        let bytes = fs::read(&job.input).map_err(io_err(&job.input))?;
        let transform_err = |source| ProcessError::Transform {
            path: job.input.clone(),
            source,
        };
        let html = std::str::from_utf8(&bytes)
            .map_err(SplashError::from)
            .map_err(transform_err)?;

        let rewrite = self
            .splash
            .highlight_blocks(html, &self.options.style, self.options.unescape)
            .map_err(transform_err)?;
        let output = crate::inject_css(&rewrite.html, &rewrite.css).map_err(transform_err)?;

        if let Some(parent) = job.output.parent() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        if job.output != job.input || rewrite.stats.highlighted > 0 {
            fs::write(&job.output, &output).map_err(io_err(&job.output))?;
        }

        Ok(FileResult {
            highlighted: rewrite.stats.highlighted,
            skipped: rewrite.stats.skipped,
            input_size: bytes.len(),
            output_size: output.len(),
        })
    }
}

/// An error and its causes, joined by `: `.
fn error_chain(error: &ProcessError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Errors that can occur during processing.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to highlight {}", path.display())]
    Transform {
        path: PathBuf,
        #[source]
        source: SplashError,
    },

    #[error("failed to walk input directory")]
    Walk(#[from] walkdir::Error),

    /// Two inputs would be written to the same output file.
    #[error(
        "{} and {} would both be written to {}",
        first.display(),
        second.display(),
        output.display()
    )]
    DuplicateOutput {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_html() {
        assert!(is_html(Path::new("a/index.html")));
        assert!(is_html(Path::new("a/INDEX.HTM")));
        assert!(!is_html(Path::new("a/style.css")));
        assert!(!is_html(Path::new("html")));
    }

    #[test]
    fn test_error_chain_lists_each_cause_once() {
        let error = ProcessError::Transform {
            path: PathBuf::from("a.html"),
            source: SplashError::MissingAnchor,
        };
        assert_eq!(
            error_chain(&error),
            "failed to highlight a.html: HTML should contain </head> or <html> to add the stylesheet"
        );
    }

    #[test]
    fn test_inflation_helpers() {
        let stats = ProcessorStats {
            bytes_input: 100,
            bytes_output: 150,
            ..ProcessorStats::default()
        };
        assert_eq!(stats.html_inflation_ratio(), 1.5);
        assert_eq!(stats.html_inflation_percent(), 50.0);
        assert_eq!(ProcessorStats::default().html_inflation_ratio(), 1.0);
        assert_eq!(ProcessorStats::default().throughput_mb_s(), 0.0);
    }
}
