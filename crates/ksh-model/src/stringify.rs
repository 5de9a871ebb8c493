use std::fmt;

use crate::ast::{ChartLine, Definition, Ksh, Line};
use crate::lane::Spin;

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.marker(), self.duration)
    }
}

impl fmt::Display for ChartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.bt.iter().collect::<String>(),
            self.fx.iter().collect::<String>(),
            self.laser.iter().collect::<String>()
        )?;
        if let Some(spin) = &self.spin {
            write!(f, "{spin}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#define_{} {} {}", self.kind, self.name, self.value)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Option { key, value } => write!(f, "{key}={value}"),
            Line::Chart(chart) => fmt::Display::fmt(chart, f),
            Line::Bar => f.write_str("--"),
            Line::Definition(definition) => fmt::Display::fmt(definition, f),
            Line::Comment { text } => write!(f, "//{text}"),
            Line::Unknown { line } => f.write_str(line),
        }
    }
}

pub fn stringify_line(line: &Line) -> String {
    line.to_string()
}

/// Render a structural model back to KSH text.
///
/// Definitions are always written after the last measure. A non-empty
/// chart always has at least one bar line.
pub fn stringify_ksh(ksh: &Ksh) -> String {
    if ksh.is_empty() {
        return String::new();
    }

    let mut output: Vec<String> = Vec::new();
    output.extend(ksh.header.iter().map(Line::to_string));
    output.push("--".to_string());
    for measure in &ksh.body {
        output.extend(measure.lines.iter().map(Line::to_string));
        output.push("--".to_string());
    }
    output.extend(ksh.footer.iter().map(Definition::to_string));

    output.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Measure;
    use crate::parse::{parse_ksh, parse_line};

    #[test]
    fn test_empty() {
        assert_eq!(stringify_ksh(&Ksh::default()), "");
    }

    #[test]
    fn test_header_only_gets_one_bar() {
        let ksh = parse_ksh("title=test\nartist=me");
        assert_eq!(stringify_ksh(&ksh), "title=test\nartist=me\n--");
    }

    #[test]
    fn test_line_forms() {
        for s in [
            "title=x",
            "1020|2S|0o",
            "0000|00|--@)96",
            "--",
            "#define_fx re type=Retrigger",
            "//comment",
            "something else",
        ] {
            let line = parse_line(s).unwrap();
            assert_eq!(stringify_line(&line), s);
        }
    }

    #[test]
    fn test_definitions_move_to_end() {
        let text = "title=x\n#define_fx a type=Flanger\n--\n0000|00|--\n--";
        let ksh = parse_ksh(text);
        assert_eq!(
            stringify_ksh(&ksh),
            "title=x\n--\n0000|00|--\n--\n#define_fx a type=Flanger"
        );
    }

    #[test]
    fn test_measures_separated() {
        let ksh = Ksh {
            header: vec![],
            body: vec![
                Measure {
                    line_no: 0,
                    lines: vec![Line::Chart(ChartLine::empty())],
                },
                Measure {
                    line_no: 2,
                    lines: vec![Line::option("t", "180"), Line::Chart(ChartLine::empty())],
                },
            ],
            footer: vec![],
        };
        assert_eq!(
            stringify_ksh(&ksh),
            "--\n0000|00|--\n--\nt=180\n0000|00|--\n--"
        );
    }
}
