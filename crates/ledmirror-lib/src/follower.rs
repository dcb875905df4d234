//! Follower group — bounded set of owned brightness-attribute handles.
//!
//! Each follower is one LED class device whose `brightness` attribute is
//! held open for writing. Fan-out is best effort: a member that fails to
//! take a value is logged and skipped, the rest still receive it. Setup is
//! the opposite: a follower that cannot be added aborts assembly entirely.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::PathBuf;

/// Hard capacity of a follower group.
pub const MAX_FOLLOWERS: usize = 4;

/// Default LED class namespace root.
///
/// Linux mandates sysfs at `/sys`; the root stays overridable (via
/// [`FollowerGroup::with_root`]) for tests and nonstandard mounts.
pub const LED_CLASS_PATH: &str = "/sys/class/leds";

const BRIGHTNESS_ATTR: &str = "brightness";

/// Follower group errors. Both variants name the offending follower so the
/// caller can report exactly which LED could not be added.
#[derive(Debug)]
pub enum GroupError {
    /// The group already holds [`MAX_FOLLOWERS`] members; nothing was opened.
    CapacityExceeded { name: String },
    /// The follower's brightness attribute could not be opened for writing.
    OpenFailed { name: String, source: io::Error },
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupError::CapacityExceeded { name } => {
                write!(
                    f,
                    "failed to add LED '{name}' to group: capacity of {MAX_FOLLOWERS} reached"
                )
            }
            GroupError::OpenFailed { name, source } => {
                write!(f, "failed to add LED '{name}' to group: {source}")
            }
        }
    }
}

impl std::error::Error for GroupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GroupError::CapacityExceeded { .. } => None,
            GroupError::OpenFailed { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, GroupError>;

struct Follower {
    name: String,
    handle: File,
}

impl Follower {
    fn write_brightness(&mut self, brightness: i32) -> io::Result<()> {
        self.handle.seek(SeekFrom::Start(0))?;
        writeln!(self.handle, "{brightness}")
    }
}

/// Ordered, bounded set of follower LEDs tracking the leader.
pub struct FollowerGroup {
    root: PathBuf,
    members: Vec<Follower>,
}

impl FollowerGroup {
    /// Empty group over the standard LED class namespace.
    pub fn new() -> Self {
        Self::with_root(LED_CLASS_PATH)
    }

    /// Empty group over an explicit LED class root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        FollowerGroup {
            root: root.into(),
            members: Vec::with_capacity(MAX_FOLLOWERS),
        }
    }

    /// Add one follower by LED name.
    ///
    /// The capacity check precedes the open, so a rejected follower costs
    /// no handle. On any failure the group is left unmodified.
    pub fn add(&mut self, name: &str) -> Result<()> {
        if self.members.len() >= MAX_FOLLOWERS {
            return Err(GroupError::CapacityExceeded { name: name.into() });
        }
        let path = self.root.join(name).join(BRIGHTNESS_ATTR);
        let handle = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|source| GroupError::OpenFailed {
                name: name.into(),
                source,
            })?;
        self.members.push(Follower {
            name: name.into(),
            handle,
        });
        Ok(())
    }

    /// Capacity-checked insertion of a pre-opened handle. Used by tests to
    /// inject handles with specific failure modes.
    #[doc(hidden)]
    pub fn add_handle(&mut self, name: &str, handle: File) -> Result<()> {
        if self.members.len() >= MAX_FOLLOWERS {
            return Err(GroupError::CapacityExceeded { name: name.into() });
        }
        self.members.push(Follower {
            name: name.into(),
            handle,
        });
        Ok(())
    }

    /// Write `brightness` to every member, best effort.
    ///
    /// Each attribute is rewound to offset 0 and given the decimal text
    /// form of the value plus a newline. A member that fails is logged and
    /// skipped; propagation to the remaining members continues.
    pub fn write_all(&mut self, brightness: i32) {
        for follower in &mut self.members {
            if let Err(e) = follower.write_brightness(brightness) {
                log::warn!(
                    "failed to write brightness to follower '{}': {e}",
                    follower.name
                );
            }
        }
    }

    /// Close every member handle. Idempotent; a no-op on an empty group.
    /// Dropping the group has the same effect.
    pub fn close_all(&mut self) {
        self.members.clear();
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|f| f.name.as_str())
    }
}

impl Default for FollowerGroup {
    fn default() -> Self {
        Self::new()
    }
}
