// KSON chart model: semantic types, JSON serialization, schema validation

pub mod audio;
pub mod beat;
pub mod bg;
pub mod camera;
mod common;
pub mod compat;
pub mod editor;
mod error;
pub mod gauge;
mod kson;
pub mod meta;
pub mod note;
pub mod schema;

pub use audio::AudioInfo;
pub use beat::{BeatInfo, TimeSig};
pub use bg::BgInfo;
pub use camera::CameraInfo;
pub use common::{
    ByMeasureIdx, ByPulse, GraphCurveValue, GraphPoint, GraphValue, PULSES_PER_WHOLE, Pulse,
};
pub use compat::{CompatInfo, KshUnknownInfo};
pub use editor::EditorInfo;
pub use error::SchemaError;
pub use gauge::GaugeInfo;
pub use kson::{KSON_VERSION, Kson};
pub use meta::{Difficulty, MetaInfo};
pub use note::{ButtonNote, LaserSection, NoteInfo};
pub use schema::{FieldPath, FromKson};
