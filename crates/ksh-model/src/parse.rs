use std::str::Chars;

use kson_model::camera::Direction;

use crate::ast::{ChartLine, Definition, Ksh, Line, Measure};
use crate::lane::{Spin, SpinKind, is_laser_char};
use crate::pulse::file_pulse_to_pulse;

const BOM: char = '\u{feff}';

/// Classify a single line. Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<Line> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(text) = line.strip_prefix("//") {
        return Some(Line::comment(text));
    }
    if line == "--" {
        return Some(Line::Bar);
    }
    if let Some(definition) = parse_definition(line) {
        return Some(Line::Definition(definition));
    }
    if let Some((key, value)) = line.split_once('=')
        && !key.is_empty()
    {
        return Some(Line::option(key, value));
    }
    if let Some(chart) = parse_chart_line(line) {
        return Some(Line::Chart(chart));
    }

    Some(Line::unknown(line))
}

/// Parse KSH text into its structural model. Never fails: unrecognized
/// lines become [`Line::Unknown`].
pub fn parse_ksh(text: &str) -> Ksh {
    let mut ksh = Ksh::default();
    let mut lines = text.lines().enumerate().map(|(line_no, line)| {
        let line = if line_no == 0 {
            let trimmed = line.trim_start();
            trimmed.strip_prefix(BOM).unwrap_or(trimmed)
        } else {
            line
        };
        (line_no, line)
    });

    // Header
    let mut first_bar = None;
    for (line_no, raw) in lines.by_ref() {
        match parse_line(raw) {
            None => {}
            Some(Line::Bar) => {
                first_bar = Some(line_no);
                break;
            }
            Some(Line::Definition(definition)) => ksh.footer.push(definition),
            Some(line @ (Line::Option { .. } | Line::Comment { .. })) => ksh.header.push(line),
            Some(_) => ksh.header.push(Line::unknown(raw.trim())),
        }
    }

    let Some(first_bar) = first_bar else {
        return ksh;
    };

    // Body
    let mut measure = Measure {
        line_no: first_bar,
        lines: Vec::new(),
    };
    for (line_no, raw) in lines {
        match parse_line(raw) {
            None => {}
            Some(Line::Bar) => {
                let next = Measure {
                    line_no,
                    lines: Vec::new(),
                };
                ksh.body.push(std::mem::replace(&mut measure, next));
            }
            Some(Line::Definition(definition)) => ksh.footer.push(definition),
            Some(line) => measure.lines.push(line),
        }
    }
    if !measure.lines.is_empty() {
        ksh.body.push(measure);
    }

    log::trace!(
        "Parsed KSH: {} header lines, {} measures, {} definitions",
        ksh.header.len(),
        ksh.body.len(),
        ksh.footer.len()
    );
    ksh
}

/// `#define_<kind> <name> <value>`
fn parse_definition(line: &str) -> Option<Definition> {
    let rest = line.strip_prefix("#define_")?;
    let (kind, rest) = split_token(rest)?;
    let (name, value) = split_token(rest)?;
    Some(Definition {
        kind: kind.to_string(),
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Split off a non-empty run of non-whitespace that must be followed by whitespace.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let end = s.find(char::is_whitespace)?;
    let (token, rest) = s.split_at(end);
    if token.is_empty() {
        return None;
    }
    Some((token, rest.trim_start()))
}

/// `BBBB|FF|LL` with an optional spin marker and duration
fn parse_chart_line(line: &str) -> Option<ChartLine> {
    let mut chars = line.chars();
    let bt = take_lanes(&mut chars, |c| matches!(c, '0' | '1' | '2'))?;
    expect_separator(&mut chars)?;
    let fx = take_lanes(&mut chars, |_| true)?;
    expect_separator(&mut chars)?;
    let laser = take_lanes(&mut chars, is_laser_char)?;

    let rest = chars.as_str();
    let spin = if rest.is_empty() {
        None
    } else {
        Some(parse_spin(rest)?)
    };

    Some(ChartLine { bt, fx, laser, spin })
}

fn take_lanes<const N: usize>(chars: &mut Chars<'_>, accept: impl Fn(char) -> bool) -> Option<[char; N]> {
    let mut lanes = ['0'; N];
    for lane in lanes.iter_mut() {
        *lane = chars.next().filter(|&c| accept(c))?;
    }
    Some(lanes)
}

fn expect_separator(chars: &mut Chars<'_>) -> Option<()> {
    (chars.next()? == '|').then_some(())
}

fn parse_spin(s: &str) -> Option<Spin> {
    let marker_end = s.char_indices().nth(2).map_or(s.len(), |(i, _)| i);
    let (marker, digits) = s.split_at(marker_end);
    let (kind, direction): (SpinKind, Direction) = Spin::parse_marker(marker)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let duration = digits.parse().ok()?;
    file_pulse_to_pulse(duration)?;
    Some(Spin {
        kind,
        direction,
        duration,
    })
}
