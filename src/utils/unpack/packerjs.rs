use std::sync::OnceLock;

use anyhow::anyhow;
use log::debug;
use regex::{Captures, Regex, RegexBuilder};

use super::unbaser::Unbaser;
use crate::utils::text;

/// Radix assumed when the packed radix argument is not a number.
const DEFAULT_RADIX: u32 = 10;
/// The packer writes `[]` instead of a radix when encoding with base 62.
const ARRAY_RADIX: u32 = 62;

/// One `}('payload', radix, count, 'symtab'.split('|')` block found in a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedOccurrence<'a> {
    pub payload: &'a str,
    pub radix: u32,
    pub count: Option<usize>,
    pub symtab: Vec<&'a str>,
}

impl<'a> PackedOccurrence<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let payload = caps.get(1)?.as_str();

        let radix = match caps.get(2)?.as_str() {
            "[]" => ARRAY_RADIX,
            radix_str => radix_str.parse::<u32>().unwrap_or(DEFAULT_RADIX),
        };

        let count = caps.get(3)?.as_str().parse::<usize>().ok();
        let symtab = caps.get(4)?.as_str().split('|').collect();

        Some(Self {
            payload,
            radix,
            count,
            symtab,
        })
    }

    /// Symbol table matches the declared count and the radix can be decoded.
    pub fn is_usable(&self) -> bool {
        self.count == Some(self.symtab.len()) && Unbaser::new(self.radix).is_ok()
    }

    /// Rewrites every token of the payload with its symbol table entry.
    ///
    /// Returns `None` for occurrences that are not usable. Tokens that do not
    /// decode, point past the table or hit an empty entry are kept as is.
    pub fn decode(&self) -> Option<String> {
        if self.count != Some(self.symtab.len()) {
            debug!(
                "[packer] malformed symtab: {} entries, {:?} declared",
                self.symtab.len(),
                self.count
            );
            return None;
        }

        let unbaser = match Unbaser::new(self.radix) {
            Ok(unbaser) => unbaser,
            Err(err) => {
                debug!("[packer] skipping occurrence: {err}");
                return None;
            }
        };

        let decoded = word_regex().replace_all(self.payload, |caps: &Captures| {
            let word = &caps[0];
            match unbaser.unbase(word) {
                Ok(idx) => match self.symtab.get(idx) {
                    Some(sym) if !sym.is_empty() => sym.to_string(),
                    _ => word.to_string(),
                },
                Err(_) => word.to_string(),
            }
        });

        Some(decoded.into_owned())
    }
}

/// Checks whether the script contains a P.A.C.K.E.R. `eval(function(p,a,c,k,e,r|d)` header.
pub fn detect(source: &str) -> bool {
    static PACKED_RE: OnceLock<Regex> = OnceLock::new();
    PACKED_RE
        .get_or_init(|| {
            RegexBuilder::new(r"eval\(function\(p,a,c,k,e,[rd]")
                .case_insensitive(true)
                .multi_line(true)
                .build()
                .unwrap()
        })
        .is_match(source)
}

/// Every candidate packed block in `source`, in order, usable or not.
pub fn occurrences(source: &str) -> impl Iterator<Item = PackedOccurrence<'_>> {
    static JUICER: OnceLock<Regex> = OnceLock::new();
    JUICER
        .get_or_init(|| {
            RegexBuilder::new(r"}\)?\('(.*?)', *(\d+|\[\]), *(\d+), *'(.*?)'\.split\('\|'\)")
                .case_insensitive(true)
                .multi_line(true)
                .build()
                .unwrap()
        })
        .captures_iter(source)
        .filter_map(|caps| PackedOccurrence::from_captures(&caps))
}

/// Unpacks P.A.C.K.E.R. packed js code.
///
/// Yields one decoded script per usable packed block, lazily and in source
/// order. Malformed blocks are skipped, non packed input yields nothing.
pub fn unpack(source: &str) -> impl Iterator<Item = String> + '_ {
    detect(source)
        .then(|| occurrences(source))
        .into_iter()
        .flatten()
        .filter_map(|occurrence| occurrence.decode())
}

pub fn unpack_first(source: &str) -> Option<String> {
    unpack(source).next()
}

/// First url found in the unpacked blocks of `source`.
pub fn extract_first_url(source: &str) -> anyhow::Result<String> {
    if !detect(source) {
        return Err(anyhow!("[packer] no packer script found"));
    }

    unpack(source)
        .find_map(|script| text::extract_url(&script).map(str::to_owned))
        .ok_or_else(|| anyhow!("[packer] no url found in unpacked script"))
}

fn word_regex() -> &'static Regex {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    WORD_RE.get_or_init(|| Regex::new(r"[A-Za-z0-9_]+").unwrap())
}
