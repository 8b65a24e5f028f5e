//! Simulated RX line for host runs and tests.
//!
//! Replays scheduled 8N1 frames as line levels:
//!
//! ```text
//! [start][b0][b1][b2][b3][b4][b5][b6][b7][stop]   (b0 = LSB)
//! ```
//!
//! Outside any frame the line rests at the idle level. No allocation: the
//! schedule is borrowed.

use crate::config::RxConfig;
use crate::line::Level;

/// Bits per 8N1 frame (start + 8 data + stop).
pub const FRAME_BITS: usize = 10;

/// Simulated line replaying frames that start at given instants.
pub struct SimLine<'a> {
    config: RxConfig,
    /// `(start_ns, byte)`, ordered by start time, non-overlapping.
    frames: &'a [(i64, u8)],
}

impl<'a> SimLine<'a> {
    pub fn new(config: RxConfig, frames: &'a [(i64, u8)]) -> Self {
        Self { config, frames }
    }

    /// Duration of one frame.
    #[inline]
    pub fn frame_ns(&self) -> i64 {
        FRAME_BITS as i64 * self.config.bit_period_ns()
    }

    /// Levels of one frame, in transmission order.
    pub fn frame_bits(config: &RxConfig, byte: u8) -> [Level; FRAME_BITS] {
        let mark = config.idle_level();
        let space = config.active_level();

        let mut bits = [mark; FRAME_BITS];
        bits[0] = space;
        for (i, slot) in bits[1..9].iter_mut().enumerate() {
            *slot = if (byte >> i) & 1 == 1 { mark } else { space };
        }
        bits
    }

    /// Line level at instant `t_ns`.
    pub fn level_at(&self, t_ns: i64) -> Level {
        let period = self.config.bit_period_ns();
        let frame_ns = self.frame_ns();

        self.frames
            .iter()
            .find(|(start, _)| t_ns >= *start && t_ns < start + frame_ns)
            .map(|(start, byte)| {
                let bit = ((t_ns - start) / period) as usize;
                Self::frame_bits(&self.config, *byte)[bit]
            })
            .unwrap_or(self.config.idle_level())
    }

    /// Instant the last frame's stop bit ends (0 if no frames).
    pub fn end_ns(&self) -> i64 {
        self.frames
            .iter()
            .map(|(start, _)| start + self.frame_ns())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_bits_lsb_first() {
        let config = RxConfig::new(9600).unwrap();
        let bits = SimLine::frame_bits(&config, 0x0D);

        let expected = [0, 1, 0, 1, 1, 0, 0, 0, 0, 1];
        for (level, want) in bits.iter().zip(expected) {
            assert_eq!(*level, Level::from_bool(want == 1));
        }
    }

    #[test]
    fn test_level_at_idles_between_frames() {
        let config = RxConfig::new(9600).unwrap();
        let p = config.bit_period_ns();
        let frames = [(10 * p, 0x00)];
        let line = SimLine::new(config, &frames);

        assert_eq!(line.level_at(0), Level::High);
        assert_eq!(line.level_at(10 * p), Level::Low); // start
        assert_eq!(line.level_at(18 * p + p / 2), Level::Low); // b7
        assert_eq!(line.level_at(19 * p), Level::High); // stop
        assert_eq!(line.level_at(25 * p), Level::High);
        assert_eq!(line.end_ns(), 20 * p);
    }
}
