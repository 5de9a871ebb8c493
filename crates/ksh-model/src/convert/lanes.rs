// Per-lane note state across chart lines

use kson_model::{ButtonNote, GraphPoint, GraphValue, LaserSection, Pulse};

use crate::lane::{ButtonChar, LaserChar};
use crate::pulse::SLAM_THRESHOLD;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ButtonLane {
    #[default]
    Idle,
    Holding(Pulse),
}

impl ButtonLane {
    /// Feed one chart line. Returns a note once it is complete.
    ///
    /// A chip written while a long note is open only ends the long note.
    pub fn advance(&mut self, c: ButtonChar, pulse: Pulse) -> Option<ButtonNote> {
        match (*self, c) {
            (Self::Idle, ButtonChar::None) => None,
            (Self::Idle, ButtonChar::Chip) => Some(ButtonNote::Chip(pulse)),
            (Self::Idle, ButtonChar::Long) => {
                *self = Self::Holding(pulse);
                None
            }
            (Self::Holding(_), ButtonChar::Long) => None,
            (Self::Holding(start), _) => {
                *self = Self::Idle;
                Some(ButtonNote::Long(start, pulse - start))
            }
        }
    }

    pub fn close(&mut self, pulse: Pulse) -> Option<ButtonNote> {
        self.advance(ButtonChar::None, pulse)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
enum LaserState {
    #[default]
    Idle,
    Open(LaserSection),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LaserLane {
    state: LaserState,
    /// Applies to the next section that starts
    wide: bool,
}

impl LaserLane {
    pub fn set_wide(&mut self, wide: bool) {
        self.wide = wide;
    }

    /// Feed one chart line. Returns a section once it is complete.
    pub fn advance(&mut self, c: LaserChar, pulse: Pulse) -> Option<LaserSection> {
        let v = match c {
            LaserChar::None => return self.close(),
            LaserChar::Continue => return None,
            LaserChar::Position(_) => c.value()?,
        };

        match &mut self.state {
            LaserState::Idle => {
                let width = if std::mem::take(&mut self.wide) { 2 } else { 1 };
                let mut section = LaserSection::new(pulse, width);
                section.points.push(GraphPoint::new(0, GraphValue::flat(v)));
                self.state = LaserState::Open(section);
            }
            LaserState::Open(section) => {
                let ry = pulse - section.y;
                match section.points.last_mut() {
                    // Short movements collapse into a slam on the previous point
                    Some(last) if ry <= last.ry + SLAM_THRESHOLD => last.v.1 = v,
                    _ => section.points.push(GraphPoint::new(ry, GraphValue::flat(v))),
                }
            }
        }
        None
    }

    pub fn close(&mut self) -> Option<LaserSection> {
        match std::mem::take(&mut self.state) {
            LaserState::Open(section) => Some(section),
            LaserState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(c: char) -> LaserChar {
        LaserChar::from_char(c).unwrap()
    }

    #[test]
    fn test_button_chip_and_long() {
        let mut lane = ButtonLane::default();
        assert_eq!(lane.advance(ButtonChar::Chip, 0), Some(ButtonNote::Chip(0)));
        assert_eq!(lane.advance(ButtonChar::Long, 240), None);
        assert_eq!(lane.advance(ButtonChar::Long, 480), None);
        assert_eq!(lane.advance(ButtonChar::None, 720), Some(ButtonNote::Long(240, 480)));
        assert_eq!(lane, ButtonLane::Idle);
    }

    #[test]
    fn test_chip_ends_long_without_emitting() {
        let mut lane = ButtonLane::default();
        lane.advance(ButtonChar::Long, 0);
        assert_eq!(lane.advance(ButtonChar::Chip, 480), Some(ButtonNote::Long(0, 480)));
        assert_eq!(lane.advance(ButtonChar::None, 960), None);
    }

    #[test]
    fn test_button_close() {
        let mut lane = ButtonLane::default();
        assert_eq!(lane.close(960), None);
        lane.advance(ButtonChar::Long, 480);
        assert_eq!(lane.close(960), Some(ButtonNote::Long(480, 480)));
    }

    #[test]
    fn test_laser_points_and_slam() {
        let mut lane = LaserLane::default();
        assert_eq!(lane.advance(pos('0'), 0), None);
        assert_eq!(lane.advance(LaserChar::Continue, 240), None);
        assert_eq!(lane.advance(pos('o'), 480), None);
        // 30 pulses later: slam
        assert_eq!(lane.advance(pos('0'), 510), None);
        let section = lane.advance(LaserChar::None, 960).unwrap();

        assert_eq!(section.y, 0);
        assert_eq!(section.width, 1);
        assert_eq!(
            section.points,
            vec![
                GraphPoint::new(0, GraphValue::flat(0.0)),
                GraphPoint::new(480, GraphValue(1.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_wide_flag_consumed_by_next_section() {
        let mut lane = LaserLane::default();
        lane.set_wide(true);
        lane.advance(pos('0'), 0);
        let first = lane.close().unwrap();
        lane.advance(pos('0'), 960);
        let second = lane.close().unwrap();

        assert_eq!(first.width, 2);
        assert_eq!(second.width, 1);
        assert_eq!(lane.close(), None);
    }
}
