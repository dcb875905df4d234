//! Termination signal handling — flips the shared shutdown flag.
//!
//! The handler is installed without `SA_RESTART`. A handler registered with
//! that flag would make the kernel transparently restart a `read(2)` blocked
//! on the leader handle, so the interruption would never surface as `EINTR`
//! and the mirror loop could not observe the shutdown request. With empty
//! flags the blocked read returns `ErrorKind::Interrupted`, the retry path
//! sees the cleared flag, and the loop exits into teardown.

use std::io;
use std::mem;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide run flag, cleared by the termination handler.
static RUNNING: AtomicBool = AtomicBool::new(true);

/// The shared shutdown flag observed by the mirror loop.
pub fn shutdown_flag() -> &'static AtomicBool {
    &RUNNING
}

extern "C" fn handle_termination(_signal: libc::c_int) {
    // Only async-signal-safe work is allowed here.
    RUNNING.store(false, Ordering::SeqCst);
}

/// Install the termination handler for SIGINT, SIGTERM and SIGHUP.
///
/// All three route through the same flag and therefore the same orderly
/// teardown path.
pub fn install() -> io::Result<()> {
    let handler: extern "C" fn(libc::c_int) = handle_termination;
    for signal in [libc::SIGINT, libc::SIGTERM, libc::SIGHUP] {
        // SAFETY: the sigaction struct is fully initialized before the call
        // and the handler body is async-signal-safe (one atomic store).
        unsafe {
            let mut action: libc::sigaction = mem::zeroed();
            action.sa_sigaction = handler as libc::sighandler_t;
            libc::sigemptyset(&mut action.sa_mask);
            // No SA_RESTART: blocked reads must see EINTR.
            action.sa_flags = 0;
            if libc::sigaction(signal, &action, ptr::null_mut()) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
    }
    Ok(())
}
