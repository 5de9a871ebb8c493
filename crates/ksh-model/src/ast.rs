// Structural model of a KSH file, as produced by the parser

use serde::Serialize;

use crate::lane::Spin;

pub const BT_LANE_COUNT: usize = 4;
pub const FX_LANE_COUNT: usize = 2;
pub const LASER_LANE_COUNT: usize = 2;

/// `BBBB|FF|LL` chart row with an optional spin suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartLine {
    pub bt: [char; BT_LANE_COUNT],
    pub fx: [char; FX_LANE_COUNT],
    pub laser: [char; LASER_LANE_COUNT],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spin: Option<Spin>,
}

impl ChartLine {
    /// A row with every lane empty.
    pub fn empty() -> Self {
        Self {
            bt: ['0'; BT_LANE_COUNT],
            fx: ['0'; FX_LANE_COUNT],
            laser: ['-'; LASER_LANE_COUNT],
            spin: None,
        }
    }
}

/// `#define_<kind> <name> <value>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub kind: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Line {
    Option { key: String, value: String },
    Chart(ChartLine),
    Bar,
    Definition(Definition),
    Comment { text: String },
    Unknown { line: String },
}

impl Line {
    pub fn option(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Option {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment { text: text.into() }
    }

    pub fn unknown(line: impl Into<String>) -> Self {
        Self::Unknown { line: line.into() }
    }

    pub fn is_chart(&self) -> bool {
        matches!(self, Self::Chart(_))
    }
}

/// Lines between two bar lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Measure {
    /// 0-indexed line number of the bar line just before the measure
    pub line_no: usize,
    /// Never contains bars or definitions
    pub lines: Vec<Line>,
}

impl Measure {
    pub fn chart_lines(&self) -> impl Iterator<Item = &ChartLine> {
        self.lines.iter().filter_map(|line| match line {
            Line::Chart(chart) => Some(chart),
            _ => None,
        })
    }

    pub fn chart_line_count(&self) -> usize {
        self.chart_lines().count()
    }
}

/// A parsed KSH file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ksh {
    /// Lines before the first bar line: options, comments and unknown lines
    pub header: Vec<Line>,
    pub body: Vec<Measure>,
    /// Definition lines from anywhere in the file
    pub footer: Vec<Definition>,
}

impl Ksh {
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.body.is_empty() && self.footer.is_empty()
    }

    /// Header options in file order.
    pub fn header_options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header.iter().filter_map(|line| match line {
            Line::Option { key, value } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }
}
