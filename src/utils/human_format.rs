//! Human-readable formatting for durations and sizes in log lines

use std::time::Duration;

/// Formats a byte count with binary units
pub fn format_size(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes < 1024 {
        return format!("{bytes}B");
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;
    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if size >= 10.0 {
        format!("{:.1}{}", size, UNITS[unit_index])
    } else {
        format!("{:.2}{}", size, UNITS[unit_index])
    }
}

/// Formats a duration, keeping sub-millisecond precision for fast stages
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros == 0 {
        return "0µs".to_string();
    }

    if micros < 1_000 {
        format!("{micros}µs")
    } else if micros < 1_000_000 {
        let millis = micros as f64 / 1_000.0;
        if millis >= 10.0 {
            format!("{millis:.0}ms")
        } else {
            format!("{millis:.2}ms")
        }
    } else if micros < 60_000_000 {
        let seconds = micros as f64 / 1_000_000.0;
        if seconds >= 10.0 {
            format!("{seconds:.1}s")
        } else {
            format!("{seconds:.2}s")
        }
    } else {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        if seconds == 0 {
            format!("{minutes}m")
        } else {
            format!("{minutes}m{seconds}s")
        }
    }
}
