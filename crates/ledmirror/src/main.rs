//! LedMirror CLI — create a virtual leader LED and mirror its brightness
//! onto a group of follower LEDs.
//!
//! The leader appears under the LED class namespace like any other LED;
//! everything written to its brightness attribute is fanned out to the
//! followers until the device goes away or the process is told to stop.

use clap::Parser;

use ledmirror_lib::error::Result;
use ledmirror_lib::follower::FollowerGroup;
use ledmirror_lib::leader::LeaderDevice;
use ledmirror_lib::mirror::{MirrorLoop, StopReason};
use ledmirror_lib::{signal, uleds};

#[derive(Parser)]
#[command(
    name = "ledmirror",
    version,
    about = "Mirror a virtual LED's brightness onto a group of follower LEDs"
)]
struct Args {
    /// Name of the virtual leader LED class device to create
    leader: String,

    /// Names of follower LEDs that will track the leader (up to 4)
    #[arg(required = true)]
    followers: Vec<String>,
}

fn run(args: &Args) -> Result<()> {
    let mut leader = LeaderDevice::create(&args.leader)?;
    println!(
        "[leader] Created virtual LED '{}' (max brightness {})",
        leader.name(),
        uleds::MAX_BRIGHTNESS
    );

    // Any follower that cannot be added aborts the run; handles opened so
    // far (leader included) are released on the way out.
    let mut group = FollowerGroup::new();
    for name in &args.followers {
        group.add(name)?;
        println!("[group]  Tracking '{name}'");
    }

    println!(
        "Mirroring brightness changes to {} follower(s)... (Ctrl+C to stop)",
        group.len()
    );

    let reason = MirrorLoop::new(&mut leader, &mut group).run(signal::shutdown_flag());
    match reason {
        StopReason::StreamEnded | StopReason::ShutdownRequested => {
            println!();
            println!("Stopped: {reason}.");
        }
        StopReason::ReadFailed(ref e) => {
            log::warn!("Failed to read brightness from {}: {e}", uleds::ULEDS_CONTROL_PATH);
        }
    }

    group.close_all();
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = Args::parse();

    if let Err(e) = signal::install() {
        eprintln!("Error: failed to install signal handlers: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
