//! Chess clock
//!
//! Every decision gets the flat per-move allowance plus whatever the side has
//! left in reserve. Time beyond the allowance comes out of the reserve, and
//! the reserve never refills.

use hexmine_core::Color;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChessClock {
    time_per_move: Duration,
    reserve: [Duration; 2],
}

impl ChessClock {
    pub fn new(time_per_move: Duration, reserve: Duration) -> Self {
        Self {
            time_per_move,
            reserve: [reserve; 2],
        }
    }

    pub fn time_per_move(&self) -> Duration {
        self.time_per_move
    }

    pub fn reserve(&self, color: Color) -> Duration {
        self.reserve[color.index()]
    }

    /// Longest a single decision by `color` may take
    pub fn budget(&self, color: Color) -> Duration {
        self.time_per_move + self.reserve(color)
    }

    /// Debit a decision that took `elapsed`. Fails with the amount of
    /// overtime when the decision blew through the whole budget; the reserve
    /// is then exhausted.
    pub fn charge(&mut self, color: Color, elapsed: Duration) -> Result<(), Duration> {
        let overrun = elapsed.saturating_sub(self.time_per_move);
        let reserve = &mut self.reserve[color.index()];
        if overrun > *reserve {
            let overtime = overrun - *reserve;
            *reserve = Duration::ZERO;
            return Err(overtime);
        }
        *reserve -= overrun;
        Ok(())
    }
}
