//! Temporary image files handed to the viewer

use crate::error::{Result, ViewerError};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// A named temporary image location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempImage {
    /// Where the image is written
    pub path: PathBuf,
    /// The path as it is substituted for `%f`
    pub command_path: String,
}

/// Hands out collision-free temporary file names.
///
/// Names embed the process id and a per-namer counter that only grows.
#[derive(Debug)]
pub struct TempNamer {
    directory: Option<PathBuf>,
    counter: AtomicU64,
}

impl TempNamer {
    /// Namer writing into the platform temporary directory
    pub fn new() -> Self {
        Self {
            directory: None,
            counter: AtomicU64::new(0),
        }
    }

    /// Namer writing into a fixed directory
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            counter: AtomicU64::new(0),
        }
    }

    /// Reserve the next file name for an image called `name`
    pub fn next_image(&self, name: &str, extension: &str) -> Result<TempImage> {
        let directory = match &self.directory {
            Some(dir) => dir.clone(),
            None => temp_directory()?,
        };
        let tag = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = directory.join(format_file_name(name, extension, std::process::id(), tag));
        let command_path = command_path(&path);

        Ok(TempImage { path, command_path })
    }
}

impl Default for TempNamer {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform temporary directory
#[cfg(target_os = "windows")]
pub fn temp_directory() -> Result<PathBuf> {
    ["TMP", "TEMP", "USERPROFILE", "WINDIR"]
        .iter()
        .find_map(|var| std::env::var_os(var).filter(|v| !v.is_empty()))
        .map(PathBuf::from)
        .ok_or_else(|| {
            ViewerError::TempDirectory(
                "Tried TMP, TEMP, USERPROFILE, and WINDIR environment variables".to_string(),
            )
        })
}

/// Platform temporary directory
#[cfg(not(target_os = "windows"))]
pub fn temp_directory() -> Result<PathBuf> {
    Ok(PathBuf::from("/tmp/"))
}

/// File name for the `tag`-th image of process `pid`.
///
/// Whitespace is removed from `name`; an empty name becomes `TempFile`.
pub fn format_file_name(name: &str, extension: &str, pid: u32, tag: u64) -> String {
    let base: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    let base = if name.is_empty() { "TempFile" } else { base.as_str() };
    format!("{}-{}-{}{}", base, pid, tag, extension)
}

/// Replace every `\` or `/` with a doubled backslash.
///
/// ImageJ macros treat a single backslash as an escape, so Windows paths
/// substituted inside a macro string need this.
pub fn double_backslashes(word: &str) -> String {
    let mut result = String::with_capacity(word.len() * 2);
    for c in word.chars() {
        if c == '\\' || c == '/' {
            result.push_str("\\\\");
        } else {
            result.push(c);
        }
    }
    result
}

fn command_path(path: &Path) -> String {
    let display = path.display().to_string();
    if cfg!(target_os = "windows") {
        double_backslashes(&display)
    } else {
        display
    }
}

/// Encode `image` to `path`; the format follows the extension
pub fn write_image(image: &DynamicImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|e| ViewerError::image_write(path, e))?;
    tracing::debug!("Wrote temporary image {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_name() {
        assert_eq!(format_file_name("Brain", ".png", 42, 0), "Brain-42-0.png");
        assert_eq!(format_file_name("My Brain\t2", ".png", 42, 3), "MyBrain2-42-3.png");
        assert_eq!(format_file_name("", ".nii", 7, 1), "TempFile-7-1.nii");
    }

    #[test]
    fn test_whitespace_only_name() {
        // Only an empty name falls back; a blank one strips to nothing
        assert_eq!(format_file_name("  ", ".png", 1, 0), "-1-0.png");
    }

    #[test]
    fn test_double_backslashes() {
        assert_eq!(double_backslashes(r"C:\Temp\a.png"), r"C:\\Temp\\a.png");
        assert_eq!(double_backslashes("C:/Temp"), r"C:\\Temp");
        assert_eq!(double_backslashes("plain"), "plain");
    }

    #[test]
    fn test_counter_increases() {
        let dir = tempfile::tempdir().unwrap();
        let namer = TempNamer::with_directory(dir.path());
        let pid = std::process::id();

        let first = namer.next_image("img", ".png").unwrap();
        let second = namer.next_image("img", ".png").unwrap();
        assert_eq!(first.path, dir.path().join(format!("img-{}-0.png", pid)));
        assert_eq!(second.path, dir.path().join(format!("img-{}-1.png", pid)));
        assert_ne!(first.path, second.path);
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_default_directory() {
        let image = TempNamer::new().next_image("", ".png").unwrap();
        assert!(image.path.starts_with("/tmp"));
        assert_eq!(image.command_path, image.path.display().to_string());
    }

    #[test]
    fn test_write_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(4, 3));

        write_image(&img, &path).unwrap();
        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (4, 3));
    }

    #[test]
    fn test_write_image_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.unknownext");
        let img = DynamicImage::ImageLuma8(image::GrayImage::new(2, 2));

        let err = write_image(&img, &path).unwrap_err();
        assert!(matches!(err, ViewerError::ImageWrite(_)));
    }
}
