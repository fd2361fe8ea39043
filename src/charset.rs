// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::runtime::CharsetId;

/// Half-width forms, so each glyph fits one terminal cell.
pub const KATAKANA_GLYPHS: &str =
    "ｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜｦﾝ";

pub const BINARY_GLYPHS: &str = "01";

const LATIN_GLYPHS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*()_+-=[]{}|;:,.<>?";

/// Glyph alphabets for every charset id. The default alphabet is never empty.
#[derive(Clone, Debug)]
pub struct CharacterSource {
    default: Vec<char>,
    katakana: Vec<char>,
    binary: Vec<char>,
    custom: Vec<char>,
}

impl Default for CharacterSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterSource {
    pub fn new() -> Self {
        Self {
            default: LATIN_GLYPHS.chars().chain(KATAKANA_GLYPHS.chars()).collect(),
            katakana: KATAKANA_GLYPHS.chars().collect(),
            binary: BINARY_GLYPHS.chars().collect(),
            custom: Vec::new(),
        }
    }

    pub fn set_custom(&mut self, glyphs: &str) {
        self.custom = sanitize_custom(glyphs);
    }

    pub fn custom(&self) -> &[char] {
        &self.custom
    }

    pub fn alphabet(&self, id: CharsetId) -> &[char] {
        resolve(id, &self.custom, &self.default, &self.katakana, &self.binary)
    }

    pub fn glyph<R: Rng + ?Sized>(&self, id: CharsetId, rng: &mut R) -> char {
        pick(self.alphabet(id), rng)
    }
}

/// One glyph for `id`, falling back to the default alphabet when a custom
/// set has nothing drawable in it.
#[allow(dead_code)]
pub fn glyph_for<R: Rng + ?Sized>(id: CharsetId, custom: &str, rng: &mut R) -> char {
    let mut source = CharacterSource::new();
    source.set_custom(custom);
    source.glyph(id, rng)
}

fn resolve<'a>(
    id: CharsetId,
    custom: &'a [char],
    default: &'a [char],
    katakana: &'a [char],
    binary: &'a [char],
) -> &'a [char] {
    match id {
        CharsetId::Katakana => katakana,
        CharsetId::Binary => binary,
        CharsetId::Custom if !custom.is_empty() => custom,
        _ => default,
    }
}

fn pick<R: Rng + ?Sized>(alphabet: &[char], rng: &mut R) -> char {
    if alphabet.is_empty() {
        return '0';
    }
    alphabet[rng.random_range(0..alphabet.len())]
}

fn sanitize_custom(glyphs: &str) -> Vec<char> {
    glyphs
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .collect()
}
