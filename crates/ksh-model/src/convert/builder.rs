// In-progress KSON tree. Optional sections are created on first write.

use std::collections::BTreeMap;

use kson_model::audio::{
    AudioEffectFxInfo, AudioEffectLaserInfo, BgmInfo, BgmPreviewInfo, KeySoundFxInfo,
    KeySoundInvokeListLaser, KeySoundLaserInfo, KeySoundLaserLegacyInfo, LegacyBgmInfo,
};
use kson_model::bg::{KshLayerInfo, KshMovieInfo, LegacyBgInfo};
use kson_model::camera::CamPatternLaserInvokeList;
use kson_model::{
    AudioInfo, BeatInfo, BgInfo, ByPulse, CameraInfo, CompatInfo, EditorInfo, GaugeInfo,
    KSON_VERSION, Kson, KshUnknownInfo, MetaInfo, NoteInfo, Pulse,
};

#[derive(Debug)]
pub(crate) struct KsonBuilder {
    pub meta: MetaInfo,
    pub beat: BeatInfo,
    pub note: NoteInfo,
    gauge: Option<GaugeInfo>,
    audio: Option<AudioInfo>,
    camera: Option<CameraInfo>,
    bg: Option<BgInfo>,
    editor: Option<EditorInfo>,
    compat: Option<CompatInfo>,
}

impl KsonBuilder {
    pub fn new() -> Self {
        Self {
            meta: MetaInfo::default(),
            beat: BeatInfo {
                bpm: Vec::new(),
                time_sig: Vec::new(),
                scroll_speed: Vec::new(),
            },
            note: NoteInfo::default(),
            gauge: None,
            audio: None,
            camera: None,
            bg: None,
            editor: None,
            compat: None,
        }
    }

    pub fn gauge(&mut self) -> &mut GaugeInfo {
        self.gauge.get_or_insert_with(Default::default)
    }

    fn audio(&mut self) -> &mut AudioInfo {
        self.audio.get_or_insert_with(Default::default)
    }

    pub fn bgm(&mut self) -> &mut BgmInfo {
        self.audio().bgm.get_or_insert_with(Default::default)
    }

    pub fn bgm_preview(&mut self) -> &mut BgmPreviewInfo {
        self.bgm().preview.get_or_insert_with(Default::default)
    }

    pub fn bgm_legacy(&mut self) -> &mut LegacyBgmInfo {
        self.bgm().legacy.get_or_insert_with(Default::default)
    }

    /// Music file played while effects are active (`m=default;fx;...`).
    pub fn aux_music_filename(&self) -> Option<&str> {
        self.audio
            .as_ref()?
            .bgm
            .as_ref()?
            .legacy
            .as_ref()?
            .fp_filenames
            .get(1)
            .map(String::as_str)
    }

    pub fn key_sound_fx(&mut self) -> &mut KeySoundFxInfo {
        let key_sound = self.audio().key_sound.get_or_insert_with(Default::default);
        key_sound.fx.get_or_insert_with(Default::default)
    }

    pub fn key_sound_laser(&mut self) -> &mut KeySoundLaserInfo {
        let key_sound = self.audio().key_sound.get_or_insert_with(Default::default);
        key_sound.laser.get_or_insert_with(Default::default)
    }

    pub fn key_sound_laser_legacy(&mut self) -> &mut KeySoundLaserLegacyInfo {
        self.key_sound_laser()
            .legacy
            .get_or_insert_with(Default::default)
    }

    pub fn slam_sounds(&mut self) -> &mut KeySoundInvokeListLaser {
        self.key_sound_laser()
            .slam_event
            .get_or_insert_with(Default::default)
    }

    pub fn audio_effect_fx(&mut self) -> &mut AudioEffectFxInfo {
        let effect = self.audio().audio_effect.get_or_insert_with(Default::default);
        effect.fx.get_or_insert_with(Default::default)
    }

    pub fn audio_effect_laser(&mut self) -> &mut AudioEffectLaserInfo {
        let effect = self.audio().audio_effect.get_or_insert_with(Default::default);
        effect.laser.get_or_insert_with(Default::default)
    }

    pub fn slam_camera_patterns(&mut self) -> &mut CamPatternLaserInvokeList {
        let camera = self.camera.get_or_insert_with(Default::default);
        let cam = camera.cam.get_or_insert_with(Default::default);
        let pattern = cam.pattern.get_or_insert_with(Default::default);
        let laser = pattern.laser.get_or_insert_with(Default::default);
        laser.slam_event.get_or_insert_with(Default::default)
    }

    pub fn bg_legacy(&mut self) -> &mut LegacyBgInfo {
        let bg = self.bg.get_or_insert_with(Default::default);
        bg.legacy.get_or_insert_with(Default::default)
    }

    pub fn bg_layer(&mut self) -> &mut KshLayerInfo {
        self.bg_legacy().layer.get_or_insert_with(Default::default)
    }

    pub fn bg_movie(&mut self) -> &mut KshMovieInfo {
        self.bg_legacy().movie.get_or_insert_with(Default::default)
    }

    pub fn editor_comments(&mut self) -> &mut Vec<ByPulse<String>> {
        let editor = self.editor.get_or_insert_with(Default::default);
        editor.comment.get_or_insert_with(Vec::new)
    }

    pub fn compat(&mut self) -> &mut CompatInfo {
        self.compat.get_or_insert_with(Default::default)
    }

    fn ksh_unknown(&mut self) -> &mut KshUnknownInfo {
        self.compat().ksh_unknown.get_or_insert_with(Default::default)
    }

    pub fn unknown_meta(&mut self) -> &mut BTreeMap<String, String> {
        self.ksh_unknown().meta.get_or_insert_with(BTreeMap::new)
    }

    pub fn unknown_option(&mut self, key: &str) -> &mut Vec<ByPulse<String>> {
        self.ksh_unknown()
            .option
            .get_or_insert_with(BTreeMap::new)
            .entry(key.to_string())
            .or_default()
    }

    pub fn unknown_lines(&mut self) -> &mut Vec<ByPulse<String>> {
        self.ksh_unknown().line.get_or_insert_with(Vec::new)
    }

    pub fn build(self) -> Kson {
        Kson {
            version: KSON_VERSION.to_string(),
            meta: self.meta,
            beat: self.beat,
            gauge: self.gauge,
            audio: self.audio,
            camera: self.camera,
            bg: self.bg,
            editor: self.editor,
            compat: self.compat,
            impl_info: None,
            note: self.note,
        }
    }
}

/// Append `(pulse, value)`, replacing the last entry if it sits on the same pulse.
pub(crate) fn upsert_at<T>(timeline: &mut Vec<(Pulse, T)>, pulse: Pulse, value: T) {
    match timeline.last_mut() {
        Some(last) if last.0 == pulse => last.1 = value,
        _ => timeline.push((pulse, value)),
    }
}
