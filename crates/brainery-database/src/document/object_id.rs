//! Twelve-byte document identifiers rendered as 24 lowercase hex characters.
//!
//! Layout: 4-byte big-endian seconds since the epoch, 5 bytes fixed for the
//! process, 3-byte wrapping counter.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;

static PROCESS_BYTES: OnceLock<[u8; 8]> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

fn process_bytes() -> &'static [u8; 8] {
    PROCESS_BYTES.get_or_init(|| {
        let random = uuid::Uuid::new_v4();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&random.as_bytes()[..8]);
        bytes
    })
}

/// Generate a new identifier.
pub fn new_object_id() -> String {
    let seed = process_bytes();
    let seconds = Utc::now().timestamp() as u32;
    let counter_start = u32::from_be_bytes([0, seed[5], seed[6], seed[7]]);
    let counter = counter_start.wrapping_add(COUNTER.fetch_add(1, Ordering::Relaxed)) & 0x00ff_ffff;

    let mut raw = [0u8; 12];
    raw[..4].copy_from_slice(&seconds.to_be_bytes());
    raw[4..9].copy_from_slice(&seed[..5]);
    raw[9..].copy_from_slice(&counter.to_be_bytes()[1..]);

    raw.iter().map(|b| format!("{b:02x}")).collect()
}

/// Whether the text has the shape of an identifier issued by [`new_object_id`].
pub fn is_object_id(value: &str) -> bool {
    value.len() == 24
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
