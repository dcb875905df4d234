//! Kernel uleds interface — control path and descriptor-record layout.
//!
//! Registering a userspace LED means writing one `uleds_user_dev` record to
//! `/dev/uleds`: a fixed 64-byte NUL-terminated name field followed by a
//! native `int` maximum-brightness field. The kernel keeps the device
//! registered for as long as the writing handle stays open.

/// Well-known control path for creating userspace LED class devices.
pub const ULEDS_CONTROL_PATH: &str = "/dev/uleds";

/// Size of the name field in `uleds_user_dev`, NUL terminator included
/// (`LED_MAX_NAME_SIZE` in `linux/uleds.h`).
pub const LED_MAX_NAME_SIZE: usize = 64;

/// Size of one `uleds_user_dev` record: name field + native i32 brightness.
pub const ULEDS_RECORD_SIZE: usize = LED_MAX_NAME_SIZE + 4;

/// Maximum brightness declared for the leader device.
pub const MAX_BRIGHTNESS: i32 = 100;

/// Build a `uleds_user_dev` descriptor record.
///
/// The name is copied with strlcpy semantics: at most
/// `LED_MAX_NAME_SIZE - 1` bytes, truncated rather than rejected, with the
/// field always NUL-terminated. `max_brightness` is laid down in host byte
/// order, matching what the kernel reads on the same machine.
pub fn descriptor_record(name: &str, max_brightness: i32) -> [u8; ULEDS_RECORD_SIZE] {
    let mut record = [0u8; ULEDS_RECORD_SIZE];
    let bytes = name.as_bytes();
    let len = bytes.len().min(LED_MAX_NAME_SIZE - 1);
    record[..len].copy_from_slice(&bytes[..len]);
    record[LED_MAX_NAME_SIZE..].copy_from_slice(&max_brightness.to_ne_bytes());
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_has_fixed_size() {
        let record = descriptor_record("panel", MAX_BRIGHTNESS);
        assert_eq!(record.len(), 68);
    }

    #[test]
    fn name_is_nul_terminated() {
        let record = descriptor_record("panel", MAX_BRIGHTNESS);
        assert_eq!(&record[..5], b"panel");
        assert!(record[5..LED_MAX_NAME_SIZE].iter().all(|&b| b == 0));
    }

    #[test]
    fn long_name_is_truncated_not_rejected() {
        let long = "x".repeat(200);
        let record = descriptor_record(&long, MAX_BRIGHTNESS);
        assert_eq!(&record[..LED_MAX_NAME_SIZE - 1], &long.as_bytes()[..63]);
        // Terminator survives truncation.
        assert_eq!(record[LED_MAX_NAME_SIZE - 1], 0);
    }

    #[test]
    fn name_of_exactly_63_bytes_fits() {
        let name = "y".repeat(63);
        let record = descriptor_record(&name, MAX_BRIGHTNESS);
        assert_eq!(&record[..63], name.as_bytes());
        assert_eq!(record[63], 0);
    }

    #[test]
    fn max_brightness_in_host_byte_order() {
        let record = descriptor_record("panel", 100);
        let field: [u8; 4] = record[LED_MAX_NAME_SIZE..].try_into().unwrap();
        assert_eq!(i32::from_ne_bytes(field), 100);
    }

    #[test]
    fn empty_name_yields_all_zero_field() {
        let record = descriptor_record("", 100);
        assert!(record[..LED_MAX_NAME_SIZE].iter().all(|&b| b == 0));
    }
}
