//! Decoding modes and their band plans.
//!
//! These tables are read by the decoding side of the application;
//! they live next to the configuration but are not part of it.

use std::fmt::{self, Display, Formatter};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodingMode {
    Ft8,
    Jt65,
    Jt9,
    Ft4,
    Wspr,
}

/// Frequencies (in MHz) keyed by band name (in metres).
pub type BandPlan = &'static [(&'static str, f64)];


const FT8_BANDS: BandPlan = &[
    ("160", 1.840),
    ("80", 3.573),
    ("60", 5.357),
    ("40", 7.074),
    ("30", 10.136),
    ("20", 14.074),
    ("17", 18.100),
    ("15", 21.074),
    ("12", 24.915),
    ("10", 28.074),
    ("6", 50.313),
];

const FT4_BANDS: BandPlan = &[
    ("80", 3.575),
    ("40", 7.0475),
    ("30", 10.140),
    ("20", 14.080),
    ("17", 18.104),
    ("15", 21.140),
    ("12", 24.919),
    ("10", 28.180),
    ("6", 50.318),
];

const WSPR_BANDS: BandPlan = &[
    ("2190", 0.136000),
    ("630", 0.474200),
    ("160", 1.836600),
    ("80", 3.568600),
    ("60", 7.038600),
    ("40", 7.038600),
    ("30", 10.138700),
    ("20", 14.095600),
    ("17", 18.104600),
    ("15", 21.094600),
    ("12", 24.924600),
    ("10", 28.124600),
    ("6", 50.293000),
    ("2", 144.489000),
    ("0.7", 432.300000),
];


impl DecodingMode {
    pub const ALL: [DecodingMode; 5] = [
        DecodingMode::Ft8,
        DecodingMode::Jt65,
        DecodingMode::Jt9,
        DecodingMode::Ft4,
        DecodingMode::Wspr,
    ];

    /// Maps a decoder output mode symbol to its mode.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '~' => Some(DecodingMode::Ft8),
            '#' => Some(DecodingMode::Jt65),
            '@' => Some(DecodingMode::Jt9),
            '+' => Some(DecodingMode::Ft4),
            '!' => Some(DecodingMode::Wspr),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            DecodingMode::Ft8 => '~',
            DecodingMode::Jt65 => '#',
            DecodingMode::Jt9 => '@',
            DecodingMode::Ft4 => '+',
            DecodingMode::Wspr => '!',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DecodingMode::Ft8 => "FT8",
            DecodingMode::Jt65 => "JT65",
            DecodingMode::Jt9 => "JT9",
            DecodingMode::Ft4 => "FT4",
            DecodingMode::Wspr => "WSPR",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
    }

    /// Returns the band plan for this mode. JT65 and JT9 have none.
    pub fn bands(self) -> BandPlan {
        match self {
            DecodingMode::Ft8 => FT8_BANDS,
            DecodingMode::Ft4 => FT4_BANDS,
            DecodingMode::Wspr => WSPR_BANDS,
            DecodingMode::Jt65 | DecodingMode::Jt9 => &[],
        }
    }

    /// Dial frequency (MHz) of `band` in this mode, if the mode is used there.
    pub fn band_frequency(self, band: &str) -> Option<f64> {
        self.bands()
            .iter()
            .find(|(band_name, _)| *band_name == band)
            .map(|(_, frequency)| *frequency)
    }
}

impl Display for DecodingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
