//! Image viewer facade: pick a template, write the image, launch the viewer

use crate::command::build;
use crate::config::ViewerConfig;
use crate::discovery::{find_viewing_application, is_fiji};
use crate::error::Result;
use crate::launch::{LaunchOutcome, ProcessLauncher};
use crate::temp_file::{write_image, TempNamer};
use crate::template::SubstitutionContext;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Result of showing one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowOutcome {
    /// Temporary file the viewer was pointed at
    pub file: PathBuf,
    /// Argument vector that was launched
    pub argv: Vec<String>,
    pub launch: LaunchOutcome,
}

/// Shows images in an external viewer such as ImageJ or Fiji
#[derive(Debug)]
pub struct ImageViewer {
    config: ViewerConfig,
    application: Option<PathBuf>,
    custom_command: Option<String>,
    title: String,
    file_extension: String,
    namer: TempNamer,
}

impl ImageViewer {
    /// Create a viewer, discovering the application unless the config names one
    pub fn new(config: ViewerConfig) -> Self {
        Self::with_namer(config, TempNamer::new())
    }

    /// Create a viewer writing temporary images through `namer`
    pub fn with_namer(config: ViewerConfig, namer: TempNamer) -> Self {
        let application = config
            .application
            .clone()
            .or_else(|| find_viewing_application(&config.executable_names, &config.search_path));
        let file_extension = config.file_extension.clone();

        Self {
            config,
            application,
            custom_command: None,
            title: String::new(),
            file_extension,
            namer,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    // ========================================
    // Command template
    // ========================================

    /// Use `command` for every image instead of the configured templates.
    /// An empty command restores the defaults.
    pub fn set_command(&mut self, command: impl Into<String>) {
        let command = command.into();
        self.custom_command = (!command.is_empty()).then_some(command);
    }

    /// The custom command if set, otherwise the grayscale template
    pub fn command(&self) -> &str {
        self.custom_command
            .as_deref()
            .unwrap_or(&self.config.view_command)
    }

    /// Template used for an image of the given kind
    pub fn command_for(&self, is_color: bool) -> &str {
        if let Some(custom) = &self.custom_command {
            return custom;
        }
        if self.application.as_deref().is_some_and(is_fiji) {
            &self.config.fiji_command
        } else if is_color {
            &self.config.view_color_command
        } else {
            &self.config.view_command
        }
    }

    // ========================================
    // Application & discovery
    // ========================================

    pub fn application(&self) -> Option<&Path> {
        self.application.as_deref()
    }

    pub fn set_application(&mut self, application: impl Into<PathBuf>) {
        self.application = Some(application.into());
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.config.search_path
    }

    /// Replace the search path and rediscover the application
    pub fn set_search_path(&mut self, search_path: Vec<PathBuf>) {
        self.config.search_path = search_path;
        self.rediscover();
    }

    pub fn executable_names(&self) -> &[String] {
        &self.config.executable_names
    }

    /// Replace the executable names and rediscover the application
    pub fn set_executable_names(&mut self, names: Vec<String>) {
        self.config.executable_names = names;
        self.rediscover();
    }

    fn rediscover(&mut self) {
        self.application =
            find_viewing_application(&self.config.executable_names, &self.config.search_path);
    }

    // ========================================
    // Title & file extension
    // ========================================

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn set_file_extension(&mut self, extension: impl Into<String>) {
        self.file_extension = extension.into();
    }

    // ========================================
    // Showing
    // ========================================

    /// Argument vector for showing `file`
    pub fn build_command(&self, file: &str, is_color: bool) -> Result<Vec<String>> {
        let app = self
            .application
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let ctx = SubstitutionContext::new(&app, file, &self.title);
        build(self.command_for(is_color), &ctx)
    }

    /// Write `image` to a temporary file and open it with the viewer.
    ///
    /// The command is built before anything touches the disk, so a
    /// missing application leaves no stray file behind.
    pub fn show(&self, image: &DynamicImage, launcher: &dyn ProcessLauncher) -> Result<ShowOutcome> {
        let temp = self.namer.next_image(&self.title, &self.file_extension)?;
        let argv = self.build_command(&temp.command_path, is_color_image(image))?;

        write_image(image, &temp.path)?;
        let launch = launcher.launch(&argv, self.config.wait_for_exit)?;

        Ok(ShowOutcome {
            file: temp.path,
            argv,
            launch,
        })
    }
}

/// Whether an image has more than the gray (and alpha) channels
pub fn is_color_image(image: &DynamicImage) -> bool {
    image.color().has_color()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        calls: Mutex<Vec<(Vec<String>, bool)>>,
    }

    impl ProcessLauncher for RecordingLauncher {
        fn launch(&self, argv: &[String], wait: bool) -> Result<LaunchOutcome> {
            self.calls.lock().unwrap().push((argv.to_vec(), wait));
            Ok(LaunchOutcome::Spawned { pid: 1 })
        }
    }

    fn config() -> ViewerConfig {
        ViewerConfig {
            view_command: "%a --gray %f".to_string(),
            view_color_command: "%a --color %f".to_string(),
            fiji_command: "%a --fiji %f".to_string(),
            file_extension: ".png".to_string(),
            search_path: Vec::new(),
            executable_names: Vec::new(),
            application: Some(PathBuf::from("/opt/ImageJ/ImageJ")),
            debug: false,
            wait_for_exit: false,
        }
    }

    #[test]
    fn test_template_selection() {
        let mut viewer = ImageViewer::new(config());
        assert_eq!(viewer.command_for(false), "%a --gray %f");
        assert_eq!(viewer.command_for(true), "%a --color %f");

        viewer.set_application("/opt/Fiji.app/ImageJ-linux64");
        assert_eq!(viewer.command_for(true), "%a --fiji %f");

        viewer.set_command("other %f");
        assert_eq!(viewer.command(), "other %f");
        assert_eq!(viewer.command_for(true), "other %f");

        viewer.set_command("");
        assert_eq!(viewer.command(), "%a --gray %f");
    }

    #[test]
    fn test_build_command_uses_title() {
        let mut viewer = ImageViewer::new(config());
        viewer.set_command("%a -title '%t'");
        viewer.set_title("Brain Scan");

        let argv = viewer.build_command("/tmp/b.png", false).unwrap();
        assert_eq!(argv, vec!["/opt/ImageJ/ImageJ", "-title", "Brain Scan", "/tmp/b.png"]);
    }

    #[test]
    fn test_discovery_from_search_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("viewer-bin"), b"").unwrap();

        let mut cfg = config();
        cfg.application = None;
        let mut viewer = ImageViewer::new(cfg);
        assert!(viewer.application().is_none());

        viewer.set_executable_names(vec!["viewer-bin".to_string()]);
        assert!(viewer.application().is_none());

        viewer.set_search_path(vec![dir.path().to_path_buf()]);
        assert_eq!(viewer.application(), Some(dir.path().join("viewer-bin").as_path()));
    }

    #[test]
    fn test_show_writes_and_launches() {
        let dir = tempfile::tempdir().unwrap();
        let mut viewer = ImageViewer::with_namer(config(), TempNamer::with_directory(dir.path()));
        viewer.set_title("scan");
        let launcher = RecordingLauncher::default();

        let image = DynamicImage::ImageRgb8(image::RgbImage::new(2, 2));
        let outcome = viewer.show(&image, &launcher).unwrap();

        assert!(outcome.file.exists());
        assert_eq!(
            outcome.file,
            dir.path().join(format!("scan-{}-0.png", std::process::id()))
        );
        assert_eq!(outcome.argv[1], "--color");
        assert_eq!(outcome.launch, LaunchOutcome::Spawned { pid: 1 });

        let calls = launcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (outcome.argv.clone(), false));
    }

    #[test]
    fn test_show_without_application() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config();
        cfg.application = None;
        let viewer = ImageViewer::with_namer(cfg, TempNamer::with_directory(dir.path()));
        let launcher = RecordingLauncher::default();

        let image = DynamicImage::ImageLuma8(image::GrayImage::new(2, 2));
        let err = viewer.show(&image, &launcher).unwrap_err();

        assert!(matches!(err, ViewerError::MissingApplication));
        assert!(launcher.calls.lock().unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_is_color_image() {
        assert!(is_color_image(&DynamicImage::ImageRgb8(image::RgbImage::new(1, 1))));
        assert!(!is_color_image(&DynamicImage::ImageLuma8(image::GrayImage::new(1, 1))));
        assert!(!is_color_image(&DynamicImage::ImageLumaA8(image::GrayAlphaImage::new(1, 1))));
    }
}
