//! Viewing application discovery
//!
//! Looks for an ImageJ/Fiji executable by joining each candidate name
//! onto each search directory, in order.

use std::path::{Path, PathBuf};

/// Platform default directories to search for a viewer
#[cfg(target_os = "windows")]
pub fn default_search_path() -> Vec<PathBuf> {
    let mut path = Vec::new();

    for var in ["PROGRAMFILES", "PROGRAMFILES(x86)", "PROGRAMW6432"] {
        if let Some(dir) = std::env::var_os(var).filter(|v| !v.is_empty()) {
            path.push(PathBuf::from(dir));
        }
    }

    if let Some(home) = dirs_next::home_dir() {
        let desktop = home.join("Desktop");
        path.push(home);
        path.push(desktop);
    }

    path
}

/// Platform default directories to search for a viewer
#[cfg(target_os = "macos")]
pub fn default_search_path() -> Vec<PathBuf> {
    ["/Applications/", "/Developer/", "/opt/", "/usr/local/"]
        .iter()
        .map(PathBuf::from)
        .collect()
}

/// Platform default directories to search for a viewer
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn default_search_path() -> Vec<PathBuf> {
    let mut path = vec![PathBuf::from("./")];
    if let Some(home) = dirs_next::home_dir() {
        path.push(home.join("bin"));
    }
    path.push(PathBuf::from("/opt/"));
    path.push(PathBuf::from("/usr/local/"));
    path
}

/// Platform default executable names, most preferred first
pub fn default_executable_names() -> Vec<String> {
    #[cfg(target_os = "windows")]
    let names: &[&str] = &[
        "Fiji.app/ImageJ-win64.exe",
        "Fiji.app/ImageJ-win32.exe",
        "ImageJ/ImageJ.exe",
    ];
    #[cfg(target_os = "macos")]
    let names: &[&str] = &["Fiji.app", "ImageJ/ImageJ64.app", "ImageJ/ImageJ.app"];
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let names: &[&str] = &[];

    names.iter().map(|n| n.to_string()).collect()
}

/// Find the first existing viewer.
///
/// Names are tried in order; for each name every search directory is
/// tried in order. On macOS application bundles (directories) are
/// accepted before plain files.
pub fn find_viewing_application<S: AsRef<str>>(
    names: &[S],
    search_path: &[PathBuf],
) -> Option<PathBuf> {
    let found = names.iter().find_map(|name| find_one(name.as_ref(), search_path));

    match &found {
        Some(app) => tracing::debug!("Found viewing application: {}", app.display()),
        None => tracing::debug!("No viewing application found in {:?}", search_path),
    }
    found
}

fn find_one(name: &str, search_path: &[PathBuf]) -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    if let Some(bundle) = first_match(name, search_path, Path::is_dir) {
        return Some(bundle);
    }

    first_match(name, search_path, Path::is_file)
}

fn first_match(name: &str, search_path: &[PathBuf], accept: fn(&Path) -> bool) -> Option<PathBuf> {
    search_path
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| accept(candidate))
}

/// Whether the application is a Fiji distribution
pub fn is_fiji(app: &Path) -> bool {
    app.to_string_lossy().contains("Fiji")
}
