//! Output encodings for text exporters.
//!
//! Binary formats ignore the hint. Labels follow the names users already
//! pass around (`utf-8`, `utf-8-sig`, `latin-1`).

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
    #[default]
    Utf8,
    /// UTF-8 prefixed with a byte-order mark; spreadsheet tools use it to detect UTF-8.
    Utf8Bom,
    /// ISO-8859-1. Characters above U+00FF are rejected.
    Latin1,
}

impl Encoding {
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf8Bom => "utf-8-sig",
            Encoding::Latin1 => "latin-1",
        }
    }

    /// Bytes to emit once, before any encoded text.
    pub fn bom(&self) -> &'static [u8] {
        match self {
            Encoding::Utf8Bom => UTF8_BOM,
            Encoding::Utf8 | Encoding::Latin1 => &[],
        }
    }

    pub fn encode<'a>(&self, s: &'a str) -> Result<Cow<'a, [u8]>> {
        match self {
            Encoding::Utf8 | Encoding::Utf8Bom => Ok(Cow::Borrowed(s.as_bytes())),
            Encoding::Latin1 => {
                if s.is_ascii() {
                    return Ok(Cow::Borrowed(s.as_bytes()));
                }
                s.chars()
                    .map(|ch| {
                        u8::try_from(u32::from(ch)).map_err(|_| Error::Encoding {
                            encoding: self.label(),
                            ch,
                        })
                    })
                    .collect::<Result<Vec<u8>>>()
                    .map(Cow::Owned)
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-8-sig" | "utf8-sig" | "utf-8-bom" | "utf8-bom" => Ok(Encoding::Utf8Bom),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Encoding::Latin1),
            other => Err(Error::Config(format!("unknown encoding '{other}'"))),
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Encoding> for String {
    fn from(e: Encoding) -> Self {
        e.label().to_string()
    }
}
