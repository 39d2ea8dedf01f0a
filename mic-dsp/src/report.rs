use core::fmt::Write;

use heapless::String;

use crate::intensity::IntensityLevel;

pub const STATUS_LINE_CAPACITY: usize = 24;

/// One console line per cycle: level and loudness, ending in `\r` so the
/// next cycle overwrites it.
pub fn status_line(level: IntensityLevel, loudness: f32) -> String<STATUS_LINE_CAPACITY> {
    let mut line = String::new();
    // Finite loudness in range takes 11 bytes. Longer values are cut short,
    // keeping the last byte for `\r`.
    let _ = write!(line, "{:2} {:8.4}", level.get(), loudness);
    line.truncate(STATUS_LINE_CAPACITY - 1);
    let _ = line.push('\r');
    line
}
