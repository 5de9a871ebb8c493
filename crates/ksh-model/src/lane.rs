// Lane character alphabets and spin markers

use kson_model::Pulse;
use kson_model::camera::Direction;
use serde::Serialize;

use crate::pulse::PULSE_MULTIPLIER;

/// Laser positions, left to right
pub const LASER_CHARS: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmno";
pub const LASER_POS_MAX: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonChar {
    None,
    Chip,
    Long,
}

/// BT lanes: `0` none, `1` chip, `2` long
pub fn bt_char(c: char) -> ButtonChar {
    match c {
        '1' => ButtonChar::Chip,
        '2' => ButtonChar::Long,
        _ => ButtonChar::None,
    }
}

/// FX lanes: `0` none, `2` chip, anything else long
pub fn fx_char(c: char) -> ButtonChar {
    match c {
        '0' => ButtonChar::None,
        '2' => ButtonChar::Chip,
        _ => ButtonChar::Long,
    }
}

/// Effect named by a legacy FX long note letter, as `Name;param...`
pub fn legacy_fx_effect(c: char) -> Option<&'static str> {
    let effect = match c {
        'S' => "Retrigger;8",
        'V' => "Retrigger;12",
        'T' => "Retrigger;16",
        'W' => "Retrigger;24",
        'U' => "Retrigger;32",
        'G' => "Gate;4",
        'H' => "Gate;8",
        'K' => "Gate;12",
        'I' => "Gate;16",
        'L' => "Gate;24",
        'J' => "Gate;32",
        'F' => "Flanger",
        'P' => "PitchShift",
        'B' => "BitCrusher",
        'Q' => "Phaser",
        'X' => "Wobble;12",
        'A' => "TapeStop",
        'D' => "SideChain",
        _ => return None,
    };
    Some(effect)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserChar {
    /// `-`
    None,
    /// `:` keeps the laser at its last position
    Continue,
    /// Index into [`LASER_CHARS`]
    Position(u32),
}

impl LaserChar {
    pub fn from_char(c: char) -> Option<Self> {
        let index = match c {
            '-' => return Some(Self::None),
            ':' => return Some(Self::Continue),
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='Z' => c as u32 - 'A' as u32 + 10,
            'a'..='o' => c as u32 - 'a' as u32 + 36,
            _ => return None,
        };
        Some(Self::Position(index))
    }

    /// Normalized position in `0.0..=1.0`.
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Position(index) => Some(f64::from(index) / f64::from(LASER_POS_MAX)),
            _ => None,
        }
    }
}

pub fn is_laser_char(c: char) -> bool {
    LaserChar::from_char(c).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinKind {
    Normal,
    Half,
    Swing,
}

/// Lane spin attached to a chart line, e.g. `@(192`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spin {
    pub kind: SpinKind,
    pub direction: Direction,
    /// Length in file pulses (192 per whole note)
    pub duration: u64,
}

impl Spin {
    pub fn parse_marker(marker: &str) -> Option<(SpinKind, Direction)> {
        let parsed = match marker {
            "@(" => (SpinKind::Normal, Direction::Left),
            "@)" => (SpinKind::Normal, Direction::Right),
            "@<" => (SpinKind::Half, Direction::Left),
            "@>" => (SpinKind::Half, Direction::Right),
            "S<" => (SpinKind::Swing, Direction::Left),
            "S>" => (SpinKind::Swing, Direction::Right),
            _ => return None,
        };
        Some(parsed)
    }

    pub fn marker(&self) -> &'static str {
        match (self.kind, self.direction) {
            (SpinKind::Normal, Direction::Left) => "@(",
            (SpinKind::Normal, Direction::Right) => "@)",
            (SpinKind::Half, Direction::Left) => "@<",
            (SpinKind::Half, Direction::Right) => "@>",
            (SpinKind::Swing, Direction::Left) => "S<",
            (SpinKind::Swing, Direction::Right) => "S>",
        }
    }

    pub fn length(&self) -> Pulse {
        self.duration.saturating_mul(PULSE_MULTIPLIER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laser_alphabet_matches_indices() {
        for (i, c) in LASER_CHARS.chars().enumerate() {
            assert_eq!(LaserChar::from_char(c), Some(LaserChar::Position(i as u32)), "{c}");
        }
        assert_eq!(LASER_CHARS.chars().count() as u32, LASER_POS_MAX + 1);
        assert_eq!(LaserChar::from_char('p'), None);
        assert_eq!(LaserChar::from_char('|'), None);
    }

    #[test]
    fn test_laser_values() {
        assert_eq!(LaserChar::from_char('0').and_then(LaserChar::value), Some(0.0));
        assert_eq!(LaserChar::from_char('o').and_then(LaserChar::value), Some(1.0));
        assert_eq!(LaserChar::from_char('P').and_then(LaserChar::value), Some(0.5));
        assert_eq!(LaserChar::Continue.value(), None);
    }

    #[test]
    fn test_button_chars() {
        assert_eq!(bt_char('0'), ButtonChar::None);
        assert_eq!(bt_char('1'), ButtonChar::Chip);
        assert_eq!(bt_char('2'), ButtonChar::Long);
        assert_eq!(fx_char('0'), ButtonChar::None);
        assert_eq!(fx_char('2'), ButtonChar::Chip);
        assert_eq!(fx_char('1'), ButtonChar::Long);
        assert_eq!(fx_char('S'), ButtonChar::Long);
    }

    #[test]
    fn test_legacy_fx() {
        assert_eq!(legacy_fx_effect('S'), Some("Retrigger;8"));
        assert_eq!(legacy_fx_effect('D'), Some("SideChain"));
        assert_eq!(legacy_fx_effect('1'), None);
    }

    #[test]
    fn test_spin_markers() {
        for marker in ["@(", "@)", "@<", "@>", "S<", "S>"] {
            let (kind, direction) = Spin::parse_marker(marker).unwrap();
            let spin = Spin {
                kind,
                direction,
                duration: 192,
            };
            assert_eq!(spin.marker(), marker);
            assert_eq!(spin.length(), 960);
        }
        assert_eq!(Spin::parse_marker("S("), None);
    }
}
