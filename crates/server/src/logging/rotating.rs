use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// An append-only log file that rolls over by size.
///
/// When a write would push the active file past `max_bytes`, the file is
/// renamed to `<name>.1`, older generations shift up by one, and the oldest
/// are removed so that at most `max_files` files exist, the active one
/// included. A single write larger than `max_bytes` still lands in one file.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes: max_bytes.max(1),
            max_files: max_files.max(1),
            file,
            written,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn generation(&self, n: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.max_files == 1 {
            self.file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.generation(self.max_files - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.max_files - 1).rev() {
            let from = self.generation(n);
            if from.exists() {
                fs::rename(&from, self.generation(n + 1))?;
            }
        }
        fs::rename(&self.path, self.generation(1))?;

        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = buf.len() as u64;
        if self.written > 0 && self.written + incoming > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }

    #[test]
    fn appends_until_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined.log");
        let mut file = RotatingFile::open(&path, 16, 3).unwrap();

        file.write_all(b"aaaa\n").unwrap();
        file.write_all(b"bbbb\n").unwrap();
        file.flush().unwrap();

        assert_eq!(read(&path), "aaaa\nbbbb\n");
        assert!(!dir.path().join("combined.log.1").exists());
    }

    #[test]
    fn rotates_and_caps_generations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined.log");
        let mut file = RotatingFile::open(&path, 10, 3).unwrap();

        for line in ["one......\n", "two......\n", "three....\n", "four.....\n"] {
            file.write_all(line.as_bytes()).unwrap();
        }
        file.flush().unwrap();

        assert_eq!(read(&path), "four.....\n");
        assert_eq!(read(&dir.path().join("combined.log.1")), "three....\n");
        assert_eq!(read(&dir.path().join("combined.log.2")), "two......\n");
        // Three files in total: the oldest generation was dropped.
        assert!(!dir.path().join("combined.log.3").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn single_file_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error.log");
        let mut file = RotatingFile::open(&path, 8, 1).unwrap();

        file.write_all(b"first..\n").unwrap();
        file.write_all(b"second.\n").unwrap();
        file.flush().unwrap();

        assert_eq!(read(&path), "second.\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn resumes_size_of_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined.log");
        fs::write(&path, "12345678").unwrap();

        let mut file = RotatingFile::open(&path, 10, 2).unwrap();
        file.write_all(b"abc\n").unwrap();
        file.flush().unwrap();

        assert_eq!(read(&dir.path().join("combined.log.1")), "12345678");
        assert_eq!(read(&path), "abc\n");
    }
}
