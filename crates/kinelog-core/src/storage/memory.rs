//! In-memory volume and diagnostic sinks used by tests and the desktop
//! harness, standing in for the SD stack.

use core::cell::Cell;

use heapless::Vec;

use super::{DiagnosticSink, FileName, VolumeDriver};

/// Capacity of one in-memory file.
pub const MEMORY_FILE_BYTES: usize = 4096;
/// How many files the fake volume can hold.
pub const MEMORY_MAX_FILES: usize = 16;
/// Chunk size used when streaming a file back out.
const READ_CHUNK_BYTES: usize = 128;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemoryVolumeError {
    NotMounted,
    /// Injected mount fault.
    MountFailed,
    /// Injected create fault.
    CreateFailed,
    /// Injected or capacity-driven write fault.
    WriteFailed,
    VolumeFull,
    NoSuchFile,
}

/// Handle into the fake volume. Files are never removed, so the slot index
/// stays valid for the lifetime of the handle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MemoryFile(usize);

#[derive(Debug, Default, Clone)]
struct StoredFile {
    name: FileName,
    data: Vec<u8, MEMORY_FILE_BYTES>,
}

/// RAM-backed [`VolumeDriver`] with fault injection, used until real card
/// hardware is attached and forever after in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryVolume {
    files: Vec<StoredFile, MEMORY_MAX_FILES>,
    mounted: bool,
    fail_next_mount: bool,
    fail_next_create: bool,
    // Cell so a test can yank the card while the session owns the volume.
    fail_appends: Cell<bool>,
}

impl MemoryVolume {
    pub fn new() -> Self {
        Self::default()
    }

    /// A volume pre-seeded with empty files, for enumeration scenarios.
    pub fn with_files(names: &[&str]) -> Self {
        let mut volume = Self::default();
        for name in names {
            volume.seed_file(name, b"");
        }
        volume
    }

    /// Place `data` under `name` regardless of mount state.
    pub fn seed_file(&mut self, name: &str, data: &[u8]) {
        let Ok(name) = FileName::try_from(name) else {
            return;
        };
        let mut stored = StoredFile {
            name,
            data: Vec::new(),
        };
        let _ = stored.data.extend_from_slice(data);
        let _ = self.files.push(stored);
    }

    /// Fail the next `mount` call.
    pub fn fail_next_mount(&mut self) {
        self.fail_next_mount = true;
    }

    /// Fail the next `create_truncated` call.
    pub fn fail_next_create(&mut self) {
        self.fail_next_create = true;
    }

    /// Fail every append until cleared, emulating a yanked card.
    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.set(fail);
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Contents stored under `name`, if any.
    pub fn file_named(&self, name: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|file| file.name.eq_ignore_ascii_case(name))
            .map(|file| file.data.as_slice())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.files
            .iter()
            .position(|file| file.name.eq_ignore_ascii_case(name))
    }
}

impl VolumeDriver for MemoryVolume {
    type File = MemoryFile;
    type Error = MemoryVolumeError;

    fn mount(&mut self) -> Result<(), Self::Error> {
        if self.fail_next_mount {
            self.fail_next_mount = false;
            return Err(MemoryVolumeError::MountFailed);
        }
        self.mounted = true;
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), Self::Error> {
        self.mounted = false;
        Ok(())
    }

    fn for_each_entry(&mut self, visit: &mut dyn FnMut(&str)) -> Result<(), Self::Error> {
        if !self.mounted {
            return Err(MemoryVolumeError::NotMounted);
        }
        for file in &self.files {
            visit(file.name.as_str());
        }
        Ok(())
    }

    fn create_truncated(&mut self, name: &str) -> Result<Self::File, Self::Error> {
        if !self.mounted {
            return Err(MemoryVolumeError::NotMounted);
        }
        if self.fail_next_create {
            self.fail_next_create = false;
            return Err(MemoryVolumeError::CreateFailed);
        }
        if let Some(slot) = self.position(name) {
            self.files[slot].data.clear();
            return Ok(MemoryFile(slot));
        }
        let name = FileName::try_from(name).map_err(|()| MemoryVolumeError::CreateFailed)?;
        self.files
            .push(StoredFile {
                name,
                data: Vec::new(),
            })
            .map_err(|_| MemoryVolumeError::VolumeFull)?;
        Ok(MemoryFile(self.files.len() - 1))
    }

    fn append(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_appends.get() {
            return Err(MemoryVolumeError::WriteFailed);
        }
        let stored = self
            .files
            .get_mut(file.0)
            .ok_or(MemoryVolumeError::NoSuchFile)?;
        stored
            .data
            .extend_from_slice(data)
            .map_err(|()| MemoryVolumeError::WriteFailed)
    }

    fn flush(&mut self, _file: &mut Self::File) -> Result<(), Self::Error> {
        Ok(())
    }

    fn close(&mut self, _file: Self::File) -> Result<(), Self::Error> {
        Ok(())
    }

    fn read_file(
        &mut self,
        name: &str,
        sink: &mut dyn FnMut(&[u8]),
    ) -> Result<(), Self::Error> {
        if !self.mounted {
            return Err(MemoryVolumeError::NotMounted);
        }
        let slot = self.position(name).ok_or(MemoryVolumeError::NoSuchFile)?;
        for chunk in self.files[slot].data.chunks(READ_CHUNK_BYTES) {
            sink(chunk);
        }
        Ok(())
    }
}

/// Discards everything written to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl DiagnosticSink for NullDiagnostics {
    fn write(&mut self, _bytes: &[u8]) {}
}

/// Collects streamed output for assertions.
#[derive(Debug, Default, Clone)]
pub struct BufferedDiagnostics {
    data: Vec<u8, 2048>,
}

impl BufferedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }
}

impl DiagnosticSink for BufferedDiagnostics {
    fn write(&mut self, bytes: &[u8]) {
        let _ = self.data.extend_from_slice(bytes);
    }
}
