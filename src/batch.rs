//! Batch conversion of terrain texture directories.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Error, Result};
use crate::image::{self, PixelMode};
use crate::pipeline::{normalize_and_resize, TargetSpec};

/// Name of the directory converted files are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "converted";

/// File extensions picked up when scanning a directory.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Configuration for a conversion run.
#[derive(Debug, Clone)]
pub struct Config {
    /// How output dimensions are chosen.
    pub target: TargetSpec,

    /// Subdirectory, next to each source file, that receives the output.
    pub output_dir_name: String,

    /// Extensions (without the dot, any case) treated as images.
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: TargetSpec::default(),
            output_dir_name: DEFAULT_OUTPUT_DIR.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        self.target.validate()?;

        let name = self.output_dir_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(Error::InvalidParameter {
                name: "output_dir_name".to_string(),
                reason: format!("{name:?} must be a plain directory name"),
            });
        }

        if self.extensions.is_empty() {
            return Err(Error::InvalidParameter {
                name: "extensions".to_string(),
                reason: "must list at least one extension".to_string(),
            });
        }

        Ok(())
    }
}

/// Outcome of converting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: PixelMode,
    pub original_size: (u32, u32),
    pub resized_size: (u32, u32),
}

/// A file that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub converted: Vec<FileReport>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.converted.extend(other.converted);
        self.failed.extend(other.failed);
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

/// List the images directly inside `dir`, sorted by path.
///
/// Subdirectories are not descended into.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn collect_images<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Result<Vec<PathBuf>> {
    let read_dir_error = |source| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut images = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if path.is_file() && has_extension(&path, extensions) {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(ext))
}

/// Where the converted copy of `input` is written: same file name, inside
/// `output_dir_name` next to the source.
#[must_use]
pub fn output_path_for(input: &Path, output_dir_name: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    let file_name = input.file_name().unwrap_or(input.as_os_str());
    parent.join(output_dir_name).join(file_name)
}

/// Converts files and directories according to a [`Config`].
#[derive(Debug, Clone)]
pub struct Processor {
    config: Config,
}

impl Processor {
    /// Create a processor with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        tracing::debug!("Processor configured with {config:?}");
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Convert a single image and write it to the output directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be loaded, converted or saved.
    pub fn process_file(&self, input: &Path) -> Result<FileReport> {
        tracing::info!("Processing image: {}", input.display());

        let source = image::load_image(input)?;
        let output = normalize_and_resize(&source, &self.config.target)?;

        let output_path = output_path_for(input, &self.config.output_dir_name);
        if let Some(dir) = output_path.parent() {
            fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        image::save_png(&output, &output_path)?;

        let report = FileReport {
            input: input.to_path_buf(),
            output: output_path,
            mode: source.mode(),
            original_size: source.dimensions(),
            resized_size: output.dimensions(),
        };

        tracing::info!("Converted image saved to: {}", report.output.display());
        tracing::info!(
            "Original size {}x{} ({}), resized to {}x{}",
            report.original_size.0,
            report.original_size.1,
            report.mode,
            report.resized_size.0,
            report.resized_size.1
        );

        Ok(report)
    }

    /// Convert a single file, or every image directly inside a directory.
    ///
    /// Per-file failures are logged and recorded in the report; the run
    /// moves on to the next file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed or a failure is
    /// not recoverable.
    pub fn run(&self, path: &Path) -> Result<BatchReport> {
        let files = if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            collect_images(path, self.config.extensions.as_slice())?
        };

        if files.is_empty() {
            tracing::warn!("No images found in {}", path.display());
        }

        self.run_files(&files)
    }

    /// Convert every asset directory directly below `root`.
    ///
    /// Each subdirectory is run as its own batch. Output directories left
    /// by earlier runs are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` or an asset directory cannot be listed.
    pub fn run_asset_root(&self, root: &Path) -> Result<BatchReport> {
        let read_dir_error = |source| Error::ReadDir {
            path: root.to_path_buf(),
            source,
        };

        let mut asset_dirs = Vec::new();
        for entry in fs::read_dir(root).map_err(read_dir_error)? {
            let path = entry.map_err(read_dir_error)?.path();
            let is_output = path
                .file_name()
                .is_some_and(|name| name == self.config.output_dir_name.as_str());
            if path.is_dir() && !is_output {
                asset_dirs.push(path);
            }
        }
        asset_dirs.sort();

        let mut report = BatchReport::default();
        for dir in asset_dirs {
            tracing::info!("Processing asset directory: {}", dir.display());
            report.merge(self.run(&dir)?);
        }

        Ok(report)
    }

    fn run_files(&self, files: &[PathBuf]) -> Result<BatchReport> {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} Converting [{bar:40.cyan/blue}] {pos}/{len}")
                .expect("valid template")
                .progress_chars("#>-"),
        );

        let mut report = BatchReport::default();
        for file in files {
            match self.process_file(file) {
                Ok(converted) => report.converted.push(converted),
                Err(err) if err.is_recoverable() => {
                    tracing::error!("Error: {}: {err}", file.display());
                    report.failed.push(FailedFile {
                        path: file.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    pb.abandon();
                    return Err(err);
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_sits_next_to_source() {
        let path = output_path_for(Path::new("assets/Terrain/grass/height.png"), "converted");
        assert_eq!(path, PathBuf::from("assets/Terrain/grass/converted/height.png"));
    }

    #[test]
    fn test_output_path_for_bare_file_name() {
        assert_eq!(output_path_for(Path::new("tile.jpg"), "out"), PathBuf::from("out/tile.jpg"));
    }

    #[test]
    fn test_extension_match_ignores_case() {
        assert!(has_extension(Path::new("a/B.PNG"), DEFAULT_EXTENSIONS.as_slice()));
        assert!(has_extension(Path::new("b.Jpeg"), DEFAULT_EXTENSIONS.as_slice()));
        assert!(!has_extension(Path::new("c.tga"), DEFAULT_EXTENSIONS.as_slice()));
        assert!(!has_extension(Path::new("png"), DEFAULT_EXTENSIONS.as_slice()));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_output_dir_name_must_be_plain() {
        for bad in ["", "..", "a/b"] {
            let config = Config {
                output_dir_name: bad.to_string(),
                ..Config::default()
            };
            assert!(config.validate().is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn test_collect_images_is_sorted_and_flat() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let images = collect_images(dir.path(), DEFAULT_EXTENSIONS.as_slice()).unwrap();
        let names: Vec<_> = images.iter().filter_map(|p| p.file_name()).collect();

        assert_eq!(names, ["a.JPG", "b.png"]);
    }

    #[test]
    fn test_collect_images_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_images(&dir.path().join("nope"), DEFAULT_EXTENSIONS.as_slice()).unwrap_err();
        assert!(matches!(err, Error::ReadDir { .. }));
    }

    #[test]
    fn test_report_merge() {
        let mut report = BatchReport::default();
        report.merge(BatchReport {
            converted: Vec::new(),
            failed: vec![FailedFile {
                path: PathBuf::from("x.png"),
                reason: "bad".to_string(),
            }],
        });
        assert_eq!(report.total(), 1);
    }
}
