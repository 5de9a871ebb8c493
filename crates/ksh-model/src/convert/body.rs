// Body pass: walks measures with a pulse cursor

use kson_model::camera::{CamPatternInvokeSpin, CamPatternInvokeSwing};
use kson_model::note::{BT_LANES, FX_LANES, LASER_LANES};
use kson_model::schema::MAX_SAFE_INTEGER;
use kson_model::{ButtonNote, GraphPoint, GraphValue, Pulse, TimeSig};

use crate::ast::{ChartLine, Ksh, Line, Measure};
use crate::error::KshError;
use crate::lane::{ButtonChar, LaserChar, Spin, SpinKind, bt_char, fx_char, legacy_fx_effect};
use crate::pulse::{measure_length, parse_file_pulse, parse_time_sig, pulse_per_line};

use super::builder::{KsonBuilder, upsert_at};
use super::effect::{self, FxInvocation};
use super::header::HeaderState;
use super::lanes::{ButtonLane, LaserLane};
use super::{DEFAULT_BPM, parse_finite_or, parse_leading_or, parse_or};

pub(crate) fn convert_body(
    ksh: &Ksh,
    header: &HeaderState,
    builder: &mut KsonBuilder,
) -> Result<(), KshError> {
    builder.beat.bpm.push((0, header.initial_bpm));
    builder.beat.time_sig.push((0, header.initial_time_sig));

    let mut converter = BodyConverter::new(builder, header.initial_time_sig);
    for (index, measure) in ksh.body.iter().enumerate() {
        converter.convert_measure(index as u64, measure)?;
    }
    converter.finish();
    Ok(())
}

/// Options that arm the next FX note on a lane
#[derive(Debug, Default)]
struct PendingFx {
    effect: Option<String>,
    param1: Option<String>,
    key_sound: Option<String>,
}

struct BodyConverter<'a> {
    builder: &'a mut KsonBuilder,
    pulse: Pulse,
    time_sig: TimeSig,
    /// Takes effect at the next measure
    next_time_sig: TimeSig,
    time_sig_changed: bool,
    bt: [ButtonLane; BT_LANES],
    fx: [ButtonLane; FX_LANES],
    laser: [LaserLane; LASER_LANES],
    pending_fx: [PendingFx; FX_LANES],
    /// `stop=` as scroll-speed steps, folded at the end
    scroll_deltas: Vec<(Pulse, f64)>,
}

impl<'a> BodyConverter<'a> {
    fn new(builder: &'a mut KsonBuilder, time_sig: TimeSig) -> Self {
        Self {
            builder,
            pulse: 0,
            time_sig,
            next_time_sig: time_sig,
            time_sig_changed: false,
            bt: Default::default(),
            fx: Default::default(),
            laser: Default::default(),
            pending_fx: Default::default(),
            scroll_deltas: Vec::new(),
        }
    }

    fn convert_measure(&mut self, index: u64, measure: &Measure) -> Result<(), KshError> {
        let line = measure.line_no + 1;

        // `beat=` ahead of the first chart line applies to this measure
        let mut has_beat = false;
        for l in measure.lines.iter().take_while(|l| !l.is_chart()) {
            if let Line::Option { key, value } = l
                && key == "beat"
            {
                self.time_sig = parse_measure_time_sig(value, line)?;
                self.time_sig_changed = true;
                has_beat = true;
            }
        }
        if std::mem::take(&mut self.time_sig_changed) {
            upsert_at(&mut self.builder.beat.time_sig, index, self.time_sig);
        }
        self.next_time_sig = self.time_sig;

        let length = measure_length(self.time_sig, line)?;
        let chart_lines = measure.chart_line_count();
        let step = pulse_per_line(length, chart_lines, line)?;

        let mut seen_chart = false;
        for l in &measure.lines {
            match l {
                Line::Chart(chart) => {
                    self.convert_chart_line(chart);
                    self.pulse += step;
                    seen_chart = true;
                }
                Line::Option { key, value } if key == "beat" => {
                    if seen_chart {
                        self.next_time_sig = parse_measure_time_sig(value, line)?;
                        self.time_sig_changed = true;
                        has_beat = true;
                    }
                }
                Line::Option { key, value } => self.convert_option(key, value),
                Line::Comment { text } => {
                    let pulse = self.pulse;
                    self.builder.editor_comments().push((pulse, text.clone()));
                }
                other => {
                    let pulse = self.pulse;
                    self.builder.unknown_lines().push((pulse, other.to_string()));
                }
            }
        }

        // A measure holding only a time signature still takes up its length
        if chart_lines == 0 && has_beat {
            self.pulse += length;
        }
        self.time_sig = self.next_time_sig;
        Ok(())
    }

    fn convert_chart_line(&mut self, chart: &ChartLine) {
        let pulse = self.pulse;

        for (lane, &c) in chart.bt.iter().enumerate() {
            if let Some(note) = self.bt[lane].advance(bt_char(c), pulse) {
                self.builder.note.bt[lane].push(note);
            }
        }

        for (lane, &c) in chart.fx.iter().enumerate() {
            let kind = fx_char(c);
            let opens_long = kind == ButtonChar::Long && self.fx[lane] == ButtonLane::Idle;
            let note = self.fx[lane].advance(kind, pulse);

            if opens_long {
                self.start_fx_effect(lane, c, pulse);
            }
            if let Some(note) = note {
                if matches!(note, ButtonNote::Chip(_))
                    && let Some(sound) = self.pending_fx[lane].key_sound.take()
                {
                    effect::add_fx_chip_sound(self.builder, lane, pulse, &sound);
                }
                self.builder.note.fx[lane].push(note);
            }
        }

        for (lane, &c) in chart.laser.iter().enumerate() {
            let Some(c) = LaserChar::from_char(c) else {
                continue;
            };
            if let Some(section) = self.laser[lane].advance(c, pulse) {
                self.builder.note.laser[lane].push(section);
            }
        }

        if let Some(spin) = chart.spin {
            self.add_spin(spin, pulse);
        }
    }

    fn start_fx_effect(&mut self, lane: usize, c: char, pulse: Pulse) {
        let pending = &mut self.pending_fx[lane];
        let armed = pending.effect.take();
        let param1 = pending.param1.take();

        let value = legacy_fx_effect(c).map(str::to_string).or(armed);
        let Some(mut invocation) = value.as_deref().and_then(FxInvocation::parse) else {
            return;
        };
        if let Some(param1) = param1 {
            invocation.override_param1(param1);
        }
        effect::add_fx_long_event(self.builder, lane, pulse, &invocation);
    }

    fn add_spin(&mut self, spin: Spin, pulse: Pulse) {
        let patterns = self.builder.slam_camera_patterns();
        let invoke = CamPatternInvokeSpin {
            y: pulse,
            direction: spin.direction,
            length: spin.length(),
        };
        match spin.kind {
            SpinKind::Normal => patterns.spin.get_or_insert_with(Vec::new).push(invoke),
            SpinKind::Half => patterns.half_spin.get_or_insert_with(Vec::new).push(invoke),
            SpinKind::Swing => {
                let swing = CamPatternInvokeSwing {
                    y: invoke.y,
                    direction: invoke.direction,
                    length: invoke.length,
                    v: None,
                };
                patterns.swing.get_or_insert_with(Vec::new).push(swing);
            }
        }
    }

    fn convert_option(&mut self, key: &str, value: &str) {
        let pulse = self.pulse;
        match key {
            "t" => {
                let bpm = parse_finite_or(key, value, DEFAULT_BPM);
                upsert_at(&mut self.builder.beat.bpm, pulse, bpm);
            }
            "stop" => match parse_file_pulse(value)
                .and_then(|length| pulse.checked_add(length))
                .filter(|&end| end <= MAX_SAFE_INTEGER)
            {
                Some(end) => {
                    self.scroll_deltas.push((pulse, -1.0));
                    self.scroll_deltas.push((end, 1.0));
                }
                None => {
                    log::warn!("Invalid stop length {value:?} at pulse {pulse}");
                    self.builder.unknown_option(key).push((pulse, value.to_string()));
                }
            },
            "chokkakuvol" => {
                let percent = parse_leading_or(key, value, 50);
                let vol = &mut self.builder.key_sound_laser().vol;
                upsert_at(vol, pulse, percent as f64 / 100.0);
            }
            "chokkakuse" if matches!(value, "up" | "down" | "swing" | "mute") => {
                let slams = self.builder.slam_sounds();
                let list = match value {
                    "up" => &mut slams.slam_up,
                    "down" => &mut slams.slam_down,
                    "swing" => &mut slams.slam_swing,
                    _ => &mut slams.slam_mute,
                };
                list.get_or_insert_with(Vec::new).push(pulse);
            }
            "filtertype" => effect::add_filter_event(self.builder, pulse, value),
            "pfiltergain" => {
                effect::add_peaking_filter_gain(self.builder, pulse, parse_or(key, value, 50))
            }
            "laserrange_l" => self.laser[0].set_wide(value == "2x"),
            "laserrange_r" => self.laser[1].set_wide(value == "2x"),
            "fx-l" => self.pending_fx[0].effect = Some(value.to_string()),
            "fx-r" => self.pending_fx[1].effect = Some(value.to_string()),
            "fx-l_param1" => self.pending_fx[0].param1 = Some(value.to_string()),
            "fx-r_param1" => self.pending_fx[1].param1 = Some(value.to_string()),
            "fx-l_se" => self.pending_fx[0].key_sound = Some(value.to_string()),
            "fx-r_se" => self.pending_fx[1].key_sound = Some(value.to_string()),
            _ => self.builder.unknown_option(key).push((pulse, value.to_string())),
        }
    }

    /// Close notes still open at the end of the chart and fold scroll speed.
    fn finish(mut self) {
        let pulse = self.pulse;
        for (lane, state) in self.bt.iter_mut().enumerate() {
            if let Some(note) = state.close(pulse) {
                self.builder.note.bt[lane].push(note);
            }
        }
        for (lane, state) in self.fx.iter_mut().enumerate() {
            if let Some(note) = state.close(pulse) {
                self.builder.note.fx[lane].push(note);
            }
        }
        for (lane, state) in self.laser.iter_mut().enumerate() {
            if let Some(section) = state.close() {
                self.builder.note.laser[lane].push(section);
            }
        }

        self.builder.beat.scroll_speed = fold_scroll_deltas(std::mem::take(&mut self.scroll_deltas));
    }
}

fn parse_measure_time_sig(value: &str, line: usize) -> Result<TimeSig, KshError> {
    parse_time_sig(value).ok_or_else(|| KshError::TimeSignature {
        line,
        value: value.to_string(),
    })
}

/// Fold scroll-speed steps into a graph starting at speed 1.
///
/// Steps on the same pulse accumulate into one point; a later pulse starts
/// a new point from the previous end value.
pub(crate) fn fold_scroll_deltas(mut deltas: Vec<(Pulse, f64)>) -> Vec<GraphPoint> {
    deltas.sort_by_key(|&(pulse, _)| pulse);

    let mut points = vec![GraphPoint::new(0, GraphValue::flat(1.0))];
    for (pulse, delta) in deltas {
        match points.last_mut() {
            Some(last) if last.ry == pulse => last.v.1 += delta,
            Some(last) => {
                let from = last.v.1;
                points.push(GraphPoint::new(pulse, GraphValue(from, from + delta)));
            }
            None => points.push(GraphPoint::new(pulse, GraphValue::flat(1.0 + delta))),
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_no_stops() {
        assert_eq!(
            fold_scroll_deltas(Vec::new()),
            vec![GraphPoint::new(0, GraphValue::flat(1.0))]
        );
    }

    #[test]
    fn test_fold_single_stop() {
        let points = fold_scroll_deltas(vec![(480, -1.0), (960, 1.0)]);
        assert_eq!(
            points,
            vec![
                GraphPoint::new(0, GraphValue::flat(1.0)),
                GraphPoint::new(480, GraphValue(1.0, 0.0)),
                GraphPoint::new(960, GraphValue(0.0, 1.0)),
            ]
        );
    }

    #[test]
    fn test_fold_overlapping_stops() {
        // Second stop starts exactly where the first ends, and one at pulse 0
        let points = fold_scroll_deltas(vec![(0, -1.0), (240, 1.0), (240, -1.0), (480, 1.0)]);
        assert_eq!(
            points,
            vec![
                GraphPoint::new(0, GraphValue(1.0, 0.0)),
                GraphPoint::new(240, GraphValue(0.0, 0.0)),
                GraphPoint::new(480, GraphValue(0.0, 1.0)),
            ]
        );
    }
}
