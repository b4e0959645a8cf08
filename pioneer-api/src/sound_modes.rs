//! Listening modes supported by the `SR` command
//!
//! The set of valid names is closed: configuration naming anything outside
//! [`SOUND_MODES`] is rejected before a receiver is ever contacted.

use std::collections::BTreeMap;

use crate::{ApiError, CodeTable, Result};

/// Every known listening mode and its 4-digit `SR` code
pub const SOUND_MODES: &[(&str, &str)] = &[
    ("STEREO", "0001"),
    ("FRONT STAGE SURROUND ADVANCE FOCUS", "0003"),
    ("FRONT STAGE SURROUND ADVANCE WIDE", "0004"),
    ("AUTO SURR/STREAM DIRECT", "0005"),
    ("AUTO SURROUND", "0006"),
    ("DIRECT", "0007"),
    ("PURE DIRECT", "0008"),
    ("STEREO DIRECT SET", "0009"),
    ("STANDARD", "0010"),
    ("PRO LOGIC", "0012"),
    ("PRO LOGIC2 MOVIE", "0013"),
    ("PRO LOGIC2 MUSIC", "0014"),
    ("PRO LOGIC2 GAME", "0015"),
    ("NEO:6 CINEMA", "0016"),
    ("NEO:6 MUSIC", "0017"),
    ("PRO LOGIC2X MOVIE", "0018"),
    ("PRO LOGIC2X MUSIC", "0019"),
    ("PRO LOGIC2X GAME", "0020"),
    ("PRO LOGIC2Z HEIGHT", "0031"),
    ("WIDE SURROUND MOVIE", "0032"),
    ("WIDE SURROUND MUSIC", "0033"),
    ("NEO:X CINEMA", "0037"),
    ("NEO:X MUSIC", "0038"),
    ("NEO:X GAME", "0039"),
    ("THX", "0050"),
    ("PRO LOGIC + THX CINEMA", "0051"),
    ("ADVANCED SURROUND", "0100"),
    ("ACTION", "0101"),
    ("SCI-FI", "0102"),
    ("DRAMA", "0103"),
    ("ENTERTAINMENT SHOW", "0104"),
    ("MONO FILM", "0105"),
    ("EXPANDED THEATER", "0106"),
    ("CLASSICAL", "0107"),
    ("UNPLUGGED", "0109"),
    ("ROCK/POP", "0110"),
    ("EXTENDED STEREO", "0112"),
    ("PHONES SURROUND", "0113"),
    ("TV SURROUND", "0116"),
    ("SPORTS", "0117"),
    ("ADVANCED GAME", "0118"),
    ("AUTO LEVEL CONTROL", "0151"),
    ("OPTIMUM SURROUND", "0152"),
    ("RETRIEVER AIR", "0153"),
];

/// The built-in code for a listening mode name
pub fn sound_mode_code(name: &str) -> Option<&'static str> {
    SOUND_MODES
        .iter()
        .find(|(mode, _)| *mode == name)
        .map(|(_, code)| *code)
}

/// Build a table from a list of names, using the built-in codes
pub fn table_from_names<I, S>(names: I) -> Result<CodeTable>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut table = CodeTable::new();
    for name in names {
        let name = name.as_ref();
        let code = sound_mode_code(name).ok_or_else(|| ApiError::UnknownSoundMode(name.to_string()))?;
        table.insert(name, code)?;
    }
    Ok(table)
}

/// Build a table from explicit codes; every name must still be a known mode
pub fn table_from_codes(codes: &BTreeMap<String, String>) -> Result<CodeTable> {
    let mut table = CodeTable::new();
    for (name, code) in codes {
        if sound_mode_code(name).is_none() {
            return Err(ApiError::UnknownSoundMode(name.clone()));
        }
        table.insert(name.as_str(), code.as_str())?;
    }
    Ok(table)
}
