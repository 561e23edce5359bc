//! Storage session: mount state, filename sequencing, and the active
//! capture file.

use core::fmt::Write as _;

use heapless::{String, Vec};
use log::{debug, info};

pub mod memory;

/// Longest filename the session tracks.
pub const FILENAME_BYTES: usize = 20;
/// Directory entries remembered per rebuild; later matches are dropped.
pub const MAX_INDEXED_FILES: usize = 100;

/// Sequential logging pattern: `log<N>.csv`, `N` a positive integer.
pub const FILE_PREFIX: &str = "log";
pub const FILE_EXTENSION: &str = ".csv";

pub type FileName = String<FILENAME_BYTES>;

/// Narrow filesystem seam the session drives. The firmware implements this
/// over the SD stack; [`memory::MemoryVolume`] implements it in RAM for
/// tests and the simulator.
pub trait VolumeDriver {
    type File;
    type Error;

    /// Bind the filesystem to the storage volume.
    fn mount(&mut self) -> Result<(), Self::Error>;

    /// Release the binding. The driver is not told about open files; the
    /// session guards that ordering.
    fn unmount(&mut self) -> Result<(), Self::Error>;

    /// Visit every entry name in the logging directory.
    fn for_each_entry(&mut self, visit: &mut dyn FnMut(&str)) -> Result<(), Self::Error>;

    /// Open `name` for exclusive write, truncating any existing content.
    fn create_truncated(&mut self, name: &str) -> Result<Self::File, Self::Error>;

    fn append(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), Self::Error>;

    /// Push buffered data to the medium without closing.
    fn flush(&mut self, file: &mut Self::File) -> Result<(), Self::Error>;

    fn close(&mut self, file: Self::File) -> Result<(), Self::Error>;

    /// Stream the contents of `name` through `sink` in driver-sized chunks.
    fn read_file(&mut self, name: &str, sink: &mut dyn FnMut(&[u8]))
    -> Result<(), Self::Error>;
}

/// Destination for streamed file dumps (the device routes this to the
/// diagnostic console).
pub trait DiagnosticSink {
    fn write(&mut self, bytes: &[u8]);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MountState {
    Unmounted,
    Mounted,
}

/// Why a storage operation was refused or failed.
#[derive(Debug)]
pub enum StorageError<E> {
    Mount(E),
    Unmount(E),
    /// Unmount refused while a capture file is open.
    CaptureActive,
    /// Operation requires a mounted volume.
    NotMounted,
    /// A capture file is already open.
    AlreadyRecording,
    /// No capture file is open.
    NotRecording,
    Open(E),
    Write(E),
    Close(E),
    Read(E),
}

/// Parse `log<N>.csv` (any ASCII case) into its sequence number.
pub fn parse_sequence(name: &str) -> Option<u32> {
    let bytes = name.as_bytes();
    let prefix_len = FILE_PREFIX.len();
    let ext_len = FILE_EXTENSION.len();
    if bytes.len() <= prefix_len + ext_len {
        return None;
    }
    let (prefix, rest) = bytes.split_at(prefix_len);
    if !prefix.eq_ignore_ascii_case(FILE_PREFIX.as_bytes()) {
        return None;
    }
    let (digits, ext) = rest.split_at(rest.len() - ext_len);
    if !ext.eq_ignore_ascii_case(FILE_EXTENSION.as_bytes()) {
        return None;
    }
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let digits = core::str::from_utf8(digits).ok()?;
    digits.parse::<u32>().ok().filter(|&seq| seq > 0)
}

/// Compose `log<seq>.csv`.
pub fn sequence_filename(seq: u32) -> FileName {
    let mut name = FileName::new();
    let _ = write!(name, "{FILE_PREFIX}{seq}{FILE_EXTENSION}");
    name
}

/// Snapshot of discovered logging files plus the next free sequence number.
///
/// Rebuilt after every successful mount and after every capture session, so
/// the derived sequence number is always strictly greater than every number
/// seen on the volume.
#[derive(Debug, Default)]
pub struct DirectoryIndex {
    names: Vec<FileName, MAX_INDEXED_FILES>,
    max_seq: u32,
}

impl DirectoryIndex {
    pub const fn new() -> Self {
        Self {
            names: Vec::new(),
            max_seq: 0,
        }
    }

    /// Record one directory entry; names outside the logging pattern are
    /// ignored, as are entries past the index capacity.
    pub fn note(&mut self, name: &str) {
        let Some(seq) = parse_sequence(name) else {
            return;
        };
        if let Ok(stored) = FileName::try_from(name) {
            let _ = self.names.push(stored);
        }
        if seq > self.max_seq {
            self.max_seq = seq;
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// One greater than the largest sequence number seen; 1 on an empty
    /// volume.
    pub fn next_seq(&self) -> u32 {
        self.max_seq + 1
    }

    /// Default active filename derived from the sequencing rule.
    pub fn next_filename(&self) -> FileName {
        sequence_filename(self.next_seq())
    }
}

/// Owns every piece of storage state the menu and the capture loop touch:
/// the driver binding, the directory index, the active filename, and the
/// open capture file. Keeping the file handle here makes the
/// unmount-versus-recording exclusion a single guard evaluated with the
/// state transition.
pub struct StorageSession<V: VolumeDriver> {
    volume: V,
    state: MountState,
    index: DirectoryIndex,
    active_name: FileName,
    capture_file: Option<V::File>,
}

impl<V: VolumeDriver> StorageSession<V> {
    pub fn new(volume: V) -> Self {
        let index = DirectoryIndex::new();
        let active_name = index.next_filename();
        Self {
            volume,
            state: MountState::Unmounted,
            index,
            active_name,
            capture_file: None,
        }
    }

    pub fn mount_state(&self) -> MountState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.state == MountState::Mounted
    }

    /// A capture file is open iff a capture session is running.
    pub fn is_recording(&self) -> bool {
        self.capture_file.is_some()
    }

    pub fn active_name(&self) -> &str {
        self.active_name.as_str()
    }

    pub fn index(&self) -> &DirectoryIndex {
        &self.index
    }

    pub fn volume(&self) -> &V {
        &self.volume
    }

    /// Bind the filesystem and enumerate the logging directory. A mount
    /// whose enumeration fails is rolled back, so Mounted always implies a
    /// fresh index.
    pub fn mount(&mut self) -> Result<(), StorageError<V::Error>> {
        self.volume.mount().map_err(StorageError::Mount)?;
        self.state = MountState::Mounted;
        if let Err(err) = self.rebuild_index() {
            let _ = self.volume.unmount();
            self.state = MountState::Unmounted;
            return Err(err);
        }
        info!(
            "storage: mounted files={} next={}",
            self.index.len(),
            self.active_name
        );
        Ok(())
    }

    /// Release the binding. Refused without effect while a capture file is
    /// open.
    pub fn unmount(&mut self) -> Result<(), StorageError<V::Error>> {
        if self.capture_file.is_some() {
            return Err(StorageError::CaptureActive);
        }
        if self.state == MountState::Unmounted {
            return Err(StorageError::NotMounted);
        }
        self.volume.unmount().map_err(StorageError::Unmount)?;
        self.state = MountState::Unmounted;
        info!("storage: unmounted");
        Ok(())
    }

    /// Re-enumerate the logging directory and re-derive the default active
    /// filename from the next free sequence number.
    pub fn rebuild_index(&mut self) -> Result<(), StorageError<V::Error>> {
        if self.state == MountState::Unmounted {
            return Err(StorageError::NotMounted);
        }
        let mut index = DirectoryIndex::new();
        self.volume
            .for_each_entry(&mut |name| index.note(name))
            .map_err(StorageError::Read)?;
        debug!(
            "storage: index rebuilt files={} next_seq={}",
            index.len(),
            index.next_seq()
        );
        self.active_name = index.next_filename();
        self.index = index;
        Ok(())
    }

    /// Set the active filename directly, bypassing sequencing. Used by the
    /// manual file-change flow; returns false when the name does not fit.
    pub fn select_active(&mut self, name: &str) -> bool {
        match FileName::try_from(name) {
            Ok(name) => {
                debug!("storage: active file now {name}");
                self.active_name = name;
                true
            }
            Err(()) => false,
        }
    }

    /// Open the active filename truncated and persist `header`. On any
    /// failure the file is closed again and nothing is considered open.
    pub fn begin_capture(&mut self, header: &str) -> Result<(), StorageError<V::Error>> {
        if self.state == MountState::Unmounted {
            return Err(StorageError::NotMounted);
        }
        if self.capture_file.is_some() {
            return Err(StorageError::AlreadyRecording);
        }
        let mut file = self
            .volume
            .create_truncated(self.active_name.as_str())
            .map_err(StorageError::Open)?;
        if let Err(err) = self.volume.append(&mut file, header.as_bytes()) {
            let _ = self.volume.close(file);
            return Err(StorageError::Write(err));
        }
        // Header hits the medium before the first sample does.
        if let Err(err) = self.volume.flush(&mut file) {
            let _ = self.volume.close(file);
            return Err(StorageError::Write(err));
        }
        self.capture_file = Some(file);
        info!("storage: capture file opened name={}", self.active_name);
        Ok(())
    }

    pub fn append_record(&mut self, record: &str) -> Result<(), StorageError<V::Error>> {
        let Some(file) = self.capture_file.as_mut() else {
            return Err(StorageError::NotRecording);
        };
        self.volume
            .append(file, record.as_bytes())
            .map_err(StorageError::Write)
    }

    /// Close the capture file and refresh the index so the next session
    /// derives a fresh sequence number.
    pub fn end_capture(&mut self) -> Result<(), StorageError<V::Error>> {
        let file = self
            .capture_file
            .take()
            .ok_or(StorageError::NotRecording)?;
        self.volume.close(file).map_err(StorageError::Close)?;
        self.rebuild_index()
    }

    /// Abort path: drop the capture file, ignoring driver complaints.
    pub fn abort_capture(&mut self) {
        if let Some(file) = self.capture_file.take() {
            let _ = self.volume.close(file);
        }
    }

    /// Stream the active file to the diagnostic sink. Requires a mounted
    /// volume.
    pub fn read_active(
        &mut self,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), StorageError<V::Error>> {
        if self.state == MountState::Unmounted {
            return Err(StorageError::NotMounted);
        }
        self.volume
            .read_file(self.active_name.as_str(), &mut |chunk| sink.write(chunk))
            .map_err(StorageError::Read)
    }
}
