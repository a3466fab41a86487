use once_cell::sync::Lazy;

// @module: Immutable voice catalog and voice-name utilities

/// Locales listed by default when no filter is given
pub const DEFAULT_FILTER_LOCALES: &[&str] = &["zh-CN", "en-US", "zh-HK", "zh-TW", "vi-VN"];

/// Voice gender as published by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

/// One catalog voice
#[derive(Debug, Clone)]
pub struct Voice {
    /// Full neural voice name, e.g. `en-US-JennyNeural`
    pub name: String,
    /// Published gender
    pub gender: Gender,
}

// Raw catalog in the upstream Name/Gender listing format. Parsed once at
// first use; the catalog is immutable for the lifetime of the process.
static VOICE_TABLE: &str = "\
Name: en-AU-NatashaNeural
Gender: Female

Name: en-AU-WilliamNeural
Gender: Male

Name: en-CA-ClaraNeural
Gender: Female

Name: en-CA-LiamNeural
Gender: Male

Name: en-GB-LibbyNeural
Gender: Female

Name: en-GB-MaisieNeural
Gender: Female

Name: en-GB-RyanNeural
Gender: Male

Name: en-GB-SoniaNeural
Gender: Female

Name: en-GB-ThomasNeural
Gender: Male

Name: en-HK-SamNeural
Gender: Male

Name: en-HK-YanNeural
Gender: Female

Name: en-IE-ConnorNeural
Gender: Male

Name: en-IE-EmilyNeural
Gender: Female

Name: en-IN-NeerjaExpressiveNeural
Gender: Female

Name: en-IN-NeerjaNeural
Gender: Female

Name: en-IN-PrabhatNeural
Gender: Male

Name: en-NZ-MitchellNeural
Gender: Male

Name: en-NZ-MollyNeural
Gender: Female

Name: en-PH-JamesNeural
Gender: Male

Name: en-PH-RosaNeural
Gender: Female

Name: en-SG-LunaNeural
Gender: Female

Name: en-SG-WayneNeural
Gender: Male

Name: en-US-AnaNeural
Gender: Female

Name: en-US-AndrewNeural
Gender: Male

Name: en-US-AriaNeural
Gender: Female

Name: en-US-AvaNeural
Gender: Female

Name: en-US-BrianNeural
Gender: Male

Name: en-US-ChristopherNeural
Gender: Male

Name: en-US-EmmaNeural
Gender: Female

Name: en-US-EricNeural
Gender: Male

Name: en-US-GuyNeural
Gender: Male

Name: en-US-JennyNeural
Gender: Female

Name: en-US-MichelleNeural
Gender: Female

Name: en-US-RogerNeural
Gender: Male

Name: en-US-SteffanNeural
Gender: Male

Name: en-ZA-LeahNeural
Gender: Female

Name: en-ZA-LukeNeural
Gender: Male

Name: de-DE-AmalaNeural
Gender: Female

Name: de-DE-ConradNeural
Gender: Male

Name: de-DE-KatjaNeural
Gender: Female

Name: de-DE-KillianNeural
Gender: Male

Name: es-ES-AlvaroNeural
Gender: Male

Name: es-ES-ElviraNeural
Gender: Female

Name: es-MX-DaliaNeural
Gender: Female

Name: es-MX-JorgeNeural
Gender: Male

Name: fr-FR-DeniseNeural
Gender: Female

Name: fr-FR-EloiseNeural
Gender: Female

Name: fr-FR-HenriNeural
Gender: Male

Name: it-IT-DiegoNeural
Gender: Male

Name: it-IT-ElsaNeural
Gender: Female

Name: it-IT-IsabellaNeural
Gender: Female

Name: ja-JP-KeitaNeural
Gender: Male

Name: ja-JP-NanamiNeural
Gender: Female

Name: ko-KR-HyunsuNeural
Gender: Male

Name: ko-KR-InJoonNeural
Gender: Male

Name: ko-KR-SunHiNeural
Gender: Female

Name: pt-BR-AntonioNeural
Gender: Male

Name: pt-BR-FranciscaNeural
Gender: Female

Name: pt-BR-ThalitaNeural
Gender: Female

Name: ru-RU-DmitryNeural
Gender: Male

Name: ru-RU-SvetlanaNeural
Gender: Female

Name: th-TH-NiwatNeural
Gender: Male

Name: th-TH-PremwadeeNeural
Gender: Female

Name: vi-VN-HoaiMyNeural
Gender: Female

Name: vi-VN-NamMinhNeural
Gender: Male

Name: zh-CN-XiaoxiaoNeural
Gender: Female

Name: zh-CN-XiaoyiNeural
Gender: Female

Name: zh-CN-YunjianNeural
Gender: Male

Name: zh-CN-YunxiNeural
Gender: Male

Name: zh-CN-YunxiaNeural
Gender: Male

Name: zh-CN-YunyangNeural
Gender: Male

Name: zh-CN-liaoning-XiaobeiNeural
Gender: Female

Name: zh-CN-shaanxi-XiaoniNeural
Gender: Female

Name: zh-HK-HiuGaaiNeural
Gender: Female

Name: zh-HK-HiuMaanNeural
Gender: Female

Name: zh-HK-WanLungNeural
Gender: Male

Name: zh-TW-HsiaoChenNeural
Gender: Female

Name: zh-TW-HsiaoYuNeural
Gender: Female

Name: zh-TW-YunJheNeural
Gender: Male

Name: en-US-AvaMultilingualNeural-V2
Gender: Female

Name: en-US-AndrewMultilingualNeural-V2
Gender: Male

Name: en-US-EmmaMultilingualNeural-V2
Gender: Female

Name: en-US-BrianMultilingualNeural-V2
Gender: Male

Name: de-DE-SeraphinaMultilingualNeural-V2
Gender: Female

Name: fr-FR-VivienneMultilingualNeural-V2
Gender: Female

Name: zh-CN-XiaoxiaoMultilingualNeural-V2
Gender: Female
";

// @const: Catalog parsed once at process start
static CATALOG: Lazy<Vec<Voice>> = Lazy::new(|| parse_catalog(VOICE_TABLE));

/// Parse the Name/Gender listing format into catalog entries
fn parse_catalog(table: &str) -> Vec<Voice> {
    let mut voices = Vec::new();
    let mut name: Option<String> = None;

    for line in table.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("Name: ") {
            name = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("Gender: ") {
            let gender = match rest.trim() {
                "Male" => Gender::Male,
                _ => Gender::Female,
            };
            if let Some(name) = name.take() {
                voices.push(Voice { name, gender });
            }
        }
    }

    voices
}

/// List catalog voices as `name-Gender` strings, sorted, optionally
/// filtered to a set of locale prefixes. `None` applies
/// [`DEFAULT_FILTER_LOCALES`]; an empty slice lists everything.
pub fn all_voices(filter_locales: Option<&[&str]>) -> Vec<String> {
    let locales = filter_locales.unwrap_or(DEFAULT_FILTER_LOCALES);

    let mut names: Vec<String> = CATALOG
        .iter()
        .filter(|v| {
            locales.is_empty()
                || locales
                    .iter()
                    .any(|loc| v.name.to_lowercase().starts_with(&loc.to_lowercase()))
        })
        .map(|v| format!("{}-{}", v.name, v.gender.as_str()))
        .collect();

    names.sort();
    names
}

/// Strip the `-Female`/`-Male` decoration a catalog listing carries so the
/// bare neural voice name can be sent to the backend
pub fn parse_voice_name(voice_name: &str) -> String {
    voice_name
        .replace("-Female", "")
        .replace("-Male", "")
        .trim()
        .to_string()
}

/// Whether a voice name carries the Azure `-V2` suffix
pub fn is_azure_v2(voice_name: &str) -> bool {
    voice_name.ends_with("-V2")
}

/// Strip the Azure `-V2` suffix if present
pub fn strip_v2_suffix(voice_name: &str) -> String {
    if let Some(base) = voice_name.strip_suffix("-V2") {
        base.trim().to_string()
    } else {
        voice_name.to_string()
    }
}

/// Format a speaking-rate multiplier as the signed percent string the
/// synthesis APIs expect: 1.0 -> "+0%", 1.2 -> "+20%", 0.85 -> "-15%"
pub fn rate_to_percent(rate: f32) -> String {
    if rate == 1.0 {
        return "+0%".to_string();
    }
    let percent = ((rate - 1.0) * 100.0).round() as i32;
    if percent > 0 {
        format!("+{}%", percent)
    } else {
        format!("{}%", percent)
    }
}
