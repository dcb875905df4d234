//! Leader device — the virtual LED whose brightness the group tracks.
//!
//! Creating the leader writes one descriptor record to the uleds control
//! path; the kernel then exposes a new LED class device and delivers every
//! brightness change as a native `int` readable from the same handle. The
//! device stays registered exactly as long as the handle is open, so
//! dropping a [`LeaderDevice`] unregisters it.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::mirror::{BrightnessSource, StopReason};
use crate::uleds;

/// Leader device creation errors.
#[derive(Debug)]
pub enum LeaderError {
    /// The requested device name was empty.
    EmptyName,
    /// The uleds control path could not be opened.
    OpenFailed(io::Error),
    /// The descriptor record could not be written; the handle is closed
    /// before this is returned.
    RegistrationFailed(io::Error),
}

impl fmt::Display for LeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderError::EmptyName => write!(f, "leader device name must not be empty"),
            LeaderError::OpenFailed(e) => {
                write!(f, "Failed to open {}: {e}", uleds::ULEDS_CONTROL_PATH)
            }
            LeaderError::RegistrationFailed(e) => {
                write!(f, "Failed to register leader device: {e}")
            }
        }
    }
}

impl std::error::Error for LeaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeaderError::EmptyName => None,
            LeaderError::OpenFailed(e) | LeaderError::RegistrationFailed(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, LeaderError>;

/// The virtual leader LED: owns the open uleds handle.
#[derive(Debug)]
pub struct LeaderDevice {
    handle: File,
    name: String,
}

impl LeaderDevice {
    /// Create and register the leader device under `/dev/uleds`.
    ///
    /// Names longer than the kernel's name field are truncated, not
    /// rejected (see [`uleds::descriptor_record`]).
    pub fn create(name: &str) -> Result<Self> {
        Self::create_at(Path::new(uleds::ULEDS_CONTROL_PATH), name)
    }

    /// Create the leader device through an explicit control path.
    pub fn create_at(control_path: &Path, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(LeaderError::EmptyName);
        }
        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .open(control_path)
            .map_err(LeaderError::OpenFailed)?;
        let record = uleds::descriptor_record(name, uleds::MAX_BRIGHTNESS);
        // On failure the handle is dropped here, closing it before the
        // kernel ever saw a complete registration.
        handle
            .write_all(&record)
            .map_err(LeaderError::RegistrationFailed)?;
        log::debug!("registered leader device '{name}'");
        Ok(LeaderDevice {
            handle,
            name: name.to_string(),
        })
    }

    /// Wrap an already-open handle. Used by tests to drive the read side
    /// from an ordinary file.
    #[doc(hidden)]
    pub fn from_handle(handle: File) -> Self {
        LeaderDevice {
            handle,
            name: String::new(),
        }
    }

    /// The name the device was requested with (pre-truncation).
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Blocking read of one native-endian brightness value.
///
/// Interrupted reads are retried while `keep_running` is set; once it is
/// cleared the interruption is treated as a shutdown request. End of stream
/// at a value boundary means the device was closed or removed.
fn read_value(
    reader: &mut impl Read,
    keep_running: &AtomicBool,
) -> std::result::Result<i32, StopReason> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Err(StopReason::StreamEnded),
            Ok(0) => {
                return Err(StopReason::ReadFailed(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "leader stream ended mid-value",
                )));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                if !keep_running.load(Ordering::SeqCst) {
                    return Err(StopReason::ShutdownRequested);
                }
                // Benign signal: retry the read.
            }
            Err(e) => return Err(StopReason::ReadFailed(e)),
        }
    }
    Ok(i32::from_ne_bytes(buf))
}

impl BrightnessSource for LeaderDevice {
    fn next_brightness(
        &mut self,
        keep_running: &AtomicBool,
    ) -> std::result::Result<i32, StopReason> {
        read_value(&mut self.handle, keep_running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn read_one(leader: &mut LeaderDevice) -> std::result::Result<i32, StopReason> {
        let running = AtomicBool::new(true);
        leader.next_brightness(&running)
    }

    #[test]
    fn create_at_writes_descriptor_record() {
        let control = tempfile::NamedTempFile::new().unwrap();
        let leader = LeaderDevice::create_at(control.path(), "panel").unwrap();
        assert_eq!(leader.name(), "panel");

        let written = fs::read(control.path()).unwrap();
        assert_eq!(
            written,
            uleds::descriptor_record("panel", uleds::MAX_BRIGHTNESS)
        );
    }

    #[test]
    fn create_at_missing_control_path_is_open_failed() {
        let dir = tempfile::tempdir().unwrap();
        let err = LeaderDevice::create_at(&dir.path().join("uleds"), "panel").unwrap_err();
        assert!(matches!(err, LeaderError::OpenFailed(_)));
    }

    #[test]
    fn create_at_rejects_empty_name() {
        let control = tempfile::NamedTempFile::new().unwrap();
        let err = LeaderDevice::create_at(control.path(), "").unwrap_err();
        assert!(matches!(err, LeaderError::EmptyName));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn create_at_full_device_is_registration_failed() {
        // /dev/full opens read-write but fails every write with ENOSPC.
        let err = LeaderDevice::create_at(Path::new("/dev/full"), "panel").unwrap_err();
        assert!(matches!(err, LeaderError::RegistrationFailed(_)));
    }

    #[test]
    fn reads_one_value_then_stream_ends() {
        let dir = tempfile::tempdir().unwrap();
        let stream = dir.path().join("stream");
        fs::write(&stream, 42i32.to_ne_bytes()).unwrap();

        let mut leader = LeaderDevice::from_handle(File::open(&stream).unwrap());
        assert_eq!(read_one(&mut leader).unwrap(), 42);
        assert!(matches!(
            read_one(&mut leader),
            Err(StopReason::StreamEnded)
        ));
    }

    #[test]
    fn reads_negative_value_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let stream = dir.path().join("stream");
        fs::write(&stream, (-1i32).to_ne_bytes()).unwrap();

        let mut leader = LeaderDevice::from_handle(File::open(&stream).unwrap());
        assert_eq!(read_one(&mut leader).unwrap(), -1);
    }

    /// Reader that fails with `Interrupted` a given number of times before
    /// serving its data, like a read racing benign signal delivery.
    struct InterruptingReader {
        interruptions_left: usize,
        data: io::Cursor<Vec<u8>>,
    }

    impl Read for InterruptingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.interruptions_left > 0 {
                self.interruptions_left -= 1;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn benign_interruption_is_retried() {
        let mut reader = InterruptingReader {
            interruptions_left: 3,
            data: io::Cursor::new(57i32.to_ne_bytes().to_vec()),
        };
        let running = AtomicBool::new(true);
        assert_eq!(read_value(&mut reader, &running).unwrap(), 57);
    }

    #[test]
    fn interruption_after_shutdown_request_stops_the_read() {
        let mut reader = InterruptingReader {
            interruptions_left: 1,
            data: io::Cursor::new(57i32.to_ne_bytes().to_vec()),
        };
        let running = AtomicBool::new(false);
        assert!(matches!(
            read_value(&mut reader, &running),
            Err(StopReason::ShutdownRequested)
        ));
    }

    #[test]
    fn eof_mid_value_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let stream = dir.path().join("stream");
        fs::write(&stream, [0x2a, 0x00]).unwrap();

        let mut leader = LeaderDevice::from_handle(File::open(&stream).unwrap());
        match read_one(&mut leader) {
            Err(StopReason::ReadFailed(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof)
            }
            other => panic!("expected ReadFailed, got {other:?}"),
        }
    }
}
