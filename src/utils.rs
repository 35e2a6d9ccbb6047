use std::{fs, io};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Image files directly inside `dir`, sorted by file name.
pub(crate) fn list_image_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub(crate) fn trace(l_type: &str, l_step: &str, start: Instant, prev_elapsed: Duration) -> Duration {
    log::trace!("{} | Total={:.2?} | {}={:.2?}", l_type, start.elapsed(), l_step, start.elapsed() - prev_elapsed);
    start.elapsed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions_are_case_insensitive() {
        assert!(is_image_file(Path::new("a/0001TP_006690_L.PNG")));
        assert!(is_image_file(Path::new("frame.jpeg")));
        assert!(!is_image_file(Path::new("labels.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn listing_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.png"), b"").unwrap();
        fs::write(dir.path().join("a.png"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let files = list_image_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }
}
