use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Download,
    Upload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferReport {
    pub direction: Direction,
    pub bytes: u64,
    pub elapsed: Duration,
}

impl TransferReport {
    pub fn new(direction: Direction, bytes: u64, elapsed: Duration) -> TransferReport {
        TransferReport {
            direction,
            bytes,
            elapsed,
        }
    }

    /// Whole KiB per second, `None` when no time was measured.
    pub fn kib_per_sec(&self) -> Option<u64> {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return None;
        }
        Some((self.bytes as f64 / (1024.0 * secs)).floor() as u64)
    }
}

impl Display for TransferReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self.direction {
            Direction::Download => "Download",
            Direction::Upload => "Upload",
        };
        match self.kib_per_sec() {
            Some(speed) => write!(f, "{} speed - {} KB/s", label, speed),
            None => write!(f, "{} speed - n/a ({} bytes)", label, self.bytes),
        }
    }
}
