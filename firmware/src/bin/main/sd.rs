//! [`VolumeDriver`] binding over the SD/FAT stack.
//!
//! The volume and the logging directory stay open as raw handles between
//! calls; RAII wrappers are reattached per operation and detached again so
//! their drop never closes a handle the session still owns.

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use embedded_sdmmc::{
    Mode, RawDirectory, RawFile, RawVolume, SdCard, SdCardError, TimeSource, Timestamp, VolumeIdx,
    VolumeManager,
};
use heapless::String;
use kinelog_core::storage::VolumeDriver;

/// Fixed timestamp source used until RTC time integration is added.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedTimeSource;

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        // 2026-01-01 00:00:00
        Timestamp {
            year_since_1970: 56,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

type FsError = embedded_sdmmc::Error<SdCardError>;

#[derive(Debug)]
pub enum SdVolumeError {
    NotMounted,
    Filesystem(FsError),
}

impl From<FsError> for SdVolumeError {
    fn from(err: FsError) -> Self {
        Self::Filesystem(err)
    }
}

/// SD card bound through `embedded-sdmmc`, logging into the root directory.
pub struct SdVolume<S, D>
where
    S: SpiDevice<u8>,
    D: DelayNs,
{
    manager: VolumeManager<SdCard<S, D>, FixedTimeSource>,
    open: Option<(RawVolume, RawDirectory)>,
}

impl<S, D> SdVolume<S, D>
where
    S: SpiDevice<u8>,
    D: DelayNs,
{
    pub fn new(sd_card: SdCard<S, D>) -> Self {
        Self {
            manager: VolumeManager::new(sd_card, FixedTimeSource),
            open: None,
        }
    }

    fn handles(&self) -> Result<(RawVolume, RawDirectory), SdVolumeError> {
        self.open.ok_or(SdVolumeError::NotMounted)
    }
}

impl<S, D> VolumeDriver for SdVolume<S, D>
where
    S: SpiDevice<u8>,
    D: DelayNs,
{
    type File = RawFile;
    type Error = SdVolumeError;

    fn mount(&mut self) -> Result<(), Self::Error> {
        if self.open.is_some() {
            return Ok(());
        }
        let volume = self.manager.open_volume(VolumeIdx(0))?;
        let directory = volume.open_root_dir()?;
        let directory = directory.to_raw_directory();
        let volume = volume.to_raw_volume();
        self.open = Some((volume, directory));
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), Self::Error> {
        let Some((volume, directory)) = self.open.take() else {
            return Ok(());
        };
        directory.to_directory(&self.manager).close()?;
        volume.to_volume(&self.manager).close()?;
        Ok(())
    }

    fn for_each_entry(&mut self, visit: &mut dyn FnMut(&str)) -> Result<(), Self::Error> {
        let (_, directory) = self.handles()?;
        let directory = directory.to_directory(&self.manager);
        let result = directory.iterate_dir(|entry| {
            if entry.attributes.is_directory() || entry.attributes.is_volume() {
                return;
            }
            let mut name = String::<16>::new();
            let _ = write!(name, "{}", entry.name);
            visit(name.as_str());
        });
        let _ = directory.to_raw_directory();
        result.map_err(SdVolumeError::Filesystem)
    }

    fn create_truncated(&mut self, name: &str) -> Result<Self::File, Self::Error> {
        let (_, directory) = self.handles()?;
        let directory = directory.to_directory(&self.manager);
        let result = directory.open_file_in_dir(name, Mode::ReadWriteCreateOrTruncate);
        match result {
            Ok(file) => {
                let raw = file.to_raw_file();
                let _ = directory.to_raw_directory();
                Ok(raw)
            }
            Err(err) => {
                let _ = directory.to_raw_directory();
                Err(err.into())
            }
        }
    }

    fn append(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), Self::Error> {
        let handle = file.to_file(&self.manager);
        let result = handle.write(data);
        *file = handle.to_raw_file();
        result.map_err(SdVolumeError::Filesystem)
    }

    fn flush(&mut self, file: &mut Self::File) -> Result<(), Self::Error> {
        let handle = file.to_file(&self.manager);
        let result = handle.flush();
        *file = handle.to_raw_file();
        result.map_err(SdVolumeError::Filesystem)
    }

    fn close(&mut self, file: Self::File) -> Result<(), Self::Error> {
        file.to_file(&self.manager)
            .close()
            .map_err(SdVolumeError::Filesystem)
    }

    fn read_file(
        &mut self,
        name: &str,
        sink: &mut dyn FnMut(&[u8]),
    ) -> Result<(), Self::Error> {
        let (_, directory) = self.handles()?;
        let directory = directory.to_directory(&self.manager);
        let result = (|| -> Result<(), FsError> {
            let file = directory.open_file_in_dir(name, Mode::ReadOnly)?;
            let mut chunk = [0u8; 64];
            loop {
                let read_now = file.read(&mut chunk)?;
                if read_now == 0 {
                    break;
                }
                sink(&chunk[..read_now]);
            }
            file.close()
        })();
        let _ = directory.to_raw_directory();
        result.map_err(SdVolumeError::Filesystem)
    }
}
