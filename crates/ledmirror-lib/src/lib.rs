//! LedMirror — mirror a virtual LED's brightness onto a group of follower LEDs.
//!
//! The library creates one userspace LED class device through the kernel's
//! uleds interface and fans every brightness change written to it out to a
//! bounded group of follower LEDs addressed via their sysfs brightness
//! attributes.

pub mod error;
pub mod follower;
pub mod leader;
pub mod mirror;
pub mod signal;
pub mod uleds;

pub use error::LedMirrorError;
