use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

/// Durable monotonic identifier counter, one file per entity kind.
///
/// The cached value is loaded once at `open`. `allocate` persists the
/// advanced counter atomically (temp file, fsync, rename) before the id
/// is handed out, so a crash can leave a gap in the sequence but never
/// reuse an id. Single-writer: no cross-process arbitration.
pub struct IdAllocator {
    path: PathBuf,
    next: u64,
}

impl IdAllocator {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let next = match fs::read_to_string(&path) {
            Ok(text) => text.trim().parse::<u64>().map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("corrupt counter file: {e}"))
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };
        Ok(Self { path, next })
    }

    /// Next id that `allocate` would return.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Return the current counter value and durably advance it.
    /// Strictly greater than every previously allocated id, across restarts.
    pub fn allocate(&mut self) -> io::Result<u64> {
        let id = self.next;
        let tmp_path = self.path.with_extension("seq.tmp");
        let mut file = File::create(&tmp_path)?;
        file.write_all((id + 1).to_string().as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;
        // The durable state is ahead of (or equal to) the cache from here on.
        self.next = id + 1;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("carbnb_test_alloc");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn starts_at_zero_without_file() {
        let mut alloc = IdAllocator::open(tmp_path("fresh.seq")).unwrap();
        assert_eq!(alloc.allocate().unwrap(), 0);
        assert_eq!(alloc.allocate().unwrap(), 1);
    }

    #[test]
    fn allocation_is_strictly_increasing() {
        let mut alloc = IdAllocator::open(tmp_path("increasing.seq")).unwrap();
        let mut last = alloc.allocate().unwrap();
        for _ in 0..10 {
            let id = alloc.allocate().unwrap();
            assert!(id > last);
            last = id;
        }
    }

    #[test]
    fn survives_restart() {
        let path = tmp_path("restart.seq");
        let n = {
            let mut alloc = IdAllocator::open(&path).unwrap();
            alloc.allocate().unwrap();
            alloc.allocate().unwrap()
        };

        // Reopen from persisted state only
        let mut alloc = IdAllocator::open(&path).unwrap();
        assert_eq!(alloc.peek(), n + 1);
        assert_eq!(alloc.allocate().unwrap(), n + 1);
    }

    #[test]
    fn corrupt_counter_file_rejected() {
        let path = tmp_path("corrupt.seq");
        fs::write(&path, "not a number").unwrap();
        assert!(IdAllocator::open(&path).is_err());
    }
}
