//! Rotary encoder decoding
//!
//! Turns clock/data level samples into detent steps. Only the rising edge
//! of the clock line produces a step; the direction comes from comparing
//! the data line against the new clock level.

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise
    Cw,
    /// Counter-clockwise
    Ccw,
}

impl Direction {
    /// Signed unit step
    pub fn delta(self) -> i16 {
        match self {
            Direction::Cw => 1,
            Direction::Ccw => -1,
        }
    }
}

/// One detent of rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub direction: Direction,
}

impl Step {
    pub const CW: Step = Step {
        direction: Direction::Cw,
    };
    pub const CCW: Step = Step {
        direction: Direction::Ccw,
    };
}

/// Edge decoder for a clock/data encoder
#[derive(Debug, Clone, Copy)]
pub struct EncoderDecoder {
    previous_clk: bool,
}

impl EncoderDecoder {
    /// Create a decoder seeded with the current clock level
    pub const fn new(initial_clk: bool) -> Self {
        Self {
            previous_clk: initial_clk,
        }
    }

    /// Feed the line levels sampled after a clock transition
    ///
    /// Returns a step on a rising clock edge. Falling edges and repeated
    /// levels (contact bounce that settles back) produce nothing.
    pub fn on_transition(&mut self, clk: bool, dt: bool) -> Option<Step> {
        let rising = clk && !self.previous_clk;
        self.previous_clk = clk;

        if !rising {
            return None;
        }

        let direction = if dt != clk {
            Direction::Cw
        } else {
            Direction::Ccw
        };
        Some(Step { direction })
    }
}
