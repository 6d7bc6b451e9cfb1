use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::toolkit::FileInterface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    Start,
    Current,
    End,
}

/// File provider sandboxed to the UI asset root.
#[derive(Debug)]
pub struct AssetFiles {
    root: PathBuf,
    open_files: HashMap<FileHandle, File>,
    next_handle: u64,
}

impl AssetFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            open_files: HashMap::new(),
            next_handle: 1,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn open_count(&self) -> usize {
        self.open_files.len()
    }

    pub fn close_all(&mut self) {
        self.open_files.clear();
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        if !is_sandboxed_path(path) {
            return None;
        }
        Some(self.root.join(path.replace('\\', "/")))
    }
}

/// Relative, non-empty and free of parent segments under either separator.
pub fn is_sandboxed_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') || path.starts_with('\\') {
        return false;
    }
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return false;
    }
    // Drive letters and UNC prefixes on Windows.
    let candidate = Path::new(path);
    if candidate.is_absolute() || path.contains(':') {
        return false;
    }
    !candidate
        .components()
        .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
}

impl FileInterface for AssetFiles {
    fn open(&mut self, path: &str) -> Option<FileHandle> {
        let Some(resolved) = self.resolve(path) else {
            warn!(path, "asset_path_rejected");
            return None;
        };
        match File::open(&resolved) {
            Ok(file) => {
                let handle = FileHandle(self.next_handle);
                self.next_handle += 1;
                self.open_files.insert(handle, file);
                debug!(path, "asset_opened");
                Some(handle)
            }
            Err(error) => {
                debug!(path, error = %error, "asset_open_failed");
                None
            }
        }
    }

    fn close(&mut self, handle: FileHandle) {
        self.open_files.remove(&handle);
    }

    fn read(&mut self, buffer: &mut [u8], handle: FileHandle) -> usize {
        let Some(file) = self.open_files.get_mut(&handle) else {
            return 0;
        };
        let mut filled = 0;
        while filled < buffer.len() {
            match file.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(count) => filled += count,
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => {
                    warn!(error = %error, "asset_read_failed");
                    break;
                }
            }
        }
        filled
    }

    fn seek(&mut self, handle: FileHandle, offset: i64, origin: SeekOrigin) -> bool {
        let Some(file) = self.open_files.get_mut(&handle) else {
            return false;
        };
        let target = match origin {
            SeekOrigin::Start => match u64::try_from(offset) {
                Ok(position) => SeekFrom::Start(position),
                Err(_) => return false,
            },
            SeekOrigin::Current => SeekFrom::Current(offset),
            SeekOrigin::End => SeekFrom::End(offset),
        };
        file.seek(target).is_ok()
    }

    fn tell(&mut self, handle: FileHandle) -> u64 {
        self.open_files
            .get_mut(&handle)
            .and_then(|file| file.stream_position().ok())
            .unwrap_or(0)
    }
}

/// Reads a whole file through any file provider.
pub fn read_all(files: &mut dyn FileInterface, path: &str) -> Option<Vec<u8>> {
    let handle = files.open(path)?;
    let mut contents = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let count = files.read(&mut chunk, handle);
        if count == 0 {
            break;
        }
        contents.extend_from_slice(&chunk[..count]);
    }
    files.close(handle);
    Some(contents)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn root_with_test_file() -> (TempDir, AssetFiles) {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("test.txt"), "Hello, RmlUi!").expect("write");
        let files = AssetFiles::new(temp.path());
        (temp, files)
    }

    #[test]
    fn parent_segments_are_rejected() {
        let (_temp, mut files) = root_with_test_file();
        for path in [
            "..",
            "../test.txt",
            "fonts/../../secret",
            "fonts\\..\\test.txt",
            "a/b/..",
            "..\\x",
        ] {
            assert!(files.open(path).is_none(), "{path} should be rejected");
        }
        assert_eq!(files.open_count(), 0);
    }

    #[test]
    fn empty_and_absolute_paths_are_rejected() {
        assert!(!is_sandboxed_path(""));
        assert!(!is_sandboxed_path("/etc/passwd"));
        assert!(!is_sandboxed_path("\\share\\file"));
        assert!(!is_sandboxed_path("C:\\ui\\hud.rml"));
        assert!(is_sandboxed_path("fonts/Roboto.ttf"));
        assert!(is_sandboxed_path("..hidden/file"));
    }

    #[test]
    fn reads_whole_small_file_into_larger_buffer() {
        let (_temp, mut files) = root_with_test_file();
        let handle = files.open("test.txt").expect("open");
        let mut buffer = [0u8; 64];
        let count = files.read(&mut buffer, handle);
        assert_eq!(count, 13);
        assert_eq!(&buffer[..count], b"Hello, RmlUi!");
        assert_eq!(files.read(&mut buffer, handle), 0);
        files.close(handle);
        assert_eq!(files.open_count(), 0);
    }

    #[test]
    fn seek_from_end_reads_the_tail() {
        let (_temp, mut files) = root_with_test_file();
        let handle = files.open("test.txt").expect("open");
        assert!(files.seek(handle, -5, SeekOrigin::End));
        assert_eq!(files.tell(handle), 8);

        let mut buffer = [0u8; 64];
        let count = files.read(&mut buffer, handle);
        assert_eq!(count, 5);
        assert_eq!(&buffer[..count], b"mlUi!");
    }

    #[test]
    fn seek_origins_move_relative_to_their_anchor() {
        let (_temp, mut files) = root_with_test_file();
        let handle = files.open("test.txt").expect("open");
        assert!(files.seek(handle, 7, SeekOrigin::Start));
        assert!(files.seek(handle, 2, SeekOrigin::Current));
        assert_eq!(files.tell(handle), 9);
        assert!(!files.seek(handle, -1, SeekOrigin::Start));
        assert_eq!(files.tell(handle), 9);
    }

    #[test]
    fn stale_handles_are_inert() {
        let (_temp, mut files) = root_with_test_file();
        let handle = files.open("test.txt").expect("open");
        files.close(handle);
        let mut buffer = [0u8; 4];
        assert_eq!(files.read(&mut buffer, handle), 0);
        assert!(!files.seek(handle, 0, SeekOrigin::Start));
        assert_eq!(files.tell(handle), 0);
    }

    #[test]
    fn backslash_paths_resolve_under_root() {
        let temp = TempDir::new().expect("tempdir");
        fs::create_dir_all(temp.path().join("fonts")).expect("mkdir");
        fs::write(temp.path().join("fonts").join("a.ttf"), [1u8, 2, 3]).expect("write");
        let mut files = AssetFiles::new(temp.path());
        assert_eq!(read_all(&mut files, "fonts\\a.ttf"), Some(vec![1, 2, 3]));
        assert_eq!(read_all(&mut files, "fonts/missing.ttf"), None);
    }
}
