//! Tests for the KSH structural parser and stringifier.

use std::path::{Path, PathBuf};

use ksh_model::{Line, ksh_to_kson, parse_ksh, stringify_ksh};
use proptest::prelude::*;

fn test_ksh_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-ksh")
        .join(name)
}

/// The sample chart is already in canonical form and reprints unchanged.
#[test]
fn test_sample_reprints_identically() {
    let text = std::fs::read_to_string(test_ksh_path("sample.ksh")).unwrap();
    let ksh = parse_ksh(&text);

    assert_eq!(ksh.header.len(), 20);
    assert_eq!(ksh.body.len(), 6);
    assert_eq!(ksh.body[0].line_no, 20);
    assert_eq!(ksh.footer.len(), 2);
    assert_eq!(stringify_ksh(&ksh), text.trim_end());
}

#[test]
fn test_crlf_and_blank_lines() {
    let ksh = parse_ksh("title=x\r\n\r\n--\r\n1000|00|--\r\n\r\n--\r\n");
    assert_eq!(ksh.header, vec![Line::option("title", "x")]);
    assert_eq!(ksh.body.len(), 1);
    assert_eq!(stringify_ksh(&ksh), "title=x\n--\n1000|00|--\n--");
}

#[test]
fn test_body_keeps_unknown_lines() {
    let ksh = parse_ksh("--\n0000|00|--\nwhatever\n--");
    assert_eq!(ksh.body[0].lines[1], Line::unknown("whatever"));
    assert_eq!(ksh.body[0].chart_line_count(), 1);
}

fn chart_line() -> impl Strategy<Value = String> {
    ("[012]{4}", "[0-2SF]{2}", "[-:05Ao]{2}").prop_map(|(bt, fx, laser)| format!("{bt}|{fx}|{laser}"))
}

fn measure() -> impl Strategy<Value = Vec<String>> {
    prop_oneof![Just(1usize), Just(2), Just(4), Just(8), Just(16)]
        .prop_flat_map(|count| prop::collection::vec(chart_line(), count))
}

fn chart_text() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("x[a-z]{0,5}=[a-z0-9]{0,6}", 0..5),
        prop::collection::vec(measure(), 1..6),
    )
        .prop_map(|(header, measures)| {
            let mut lines = header;
            lines.push("--".to_string());
            for measure in measures {
                lines.extend(measure);
                lines.push("--".to_string());
            }
            lines.join("\n")
        })
}

proptest! {
    #[test]
    fn canonical_text_round_trips(text in chart_text()) {
        let ksh = parse_ksh(&text);
        prop_assert_eq!(stringify_ksh(&ksh), text);
    }

    #[test]
    fn parser_never_panics(text in "\\PC{0,200}") {
        let ksh = parse_ksh(&text);
        let reparsed = parse_ksh(&stringify_ksh(&ksh));
        prop_assert_eq!(reparsed.footer, ksh.footer);
    }

    #[test]
    fn converted_notes_are_ordered(text in chart_text()) {
        let kson = ksh_to_kson(&parse_ksh(&text)).unwrap();

        for lane in kson.note.bt.iter().chain(kson.note.fx.iter()) {
            for pair in lane.windows(2) {
                prop_assert!(pair[0].end() <= pair[1].y());
            }
        }
        for lane in &kson.note.laser {
            for section in lane {
                for pair in section.points.windows(2) {
                    prop_assert!(pair[0].ry < pair[1].ry);
                }
            }
        }
    }
}
