// src/decode/mod.rs

mod positional;

use crate::error::IngestError;
use crate::report::{ChannelKind, SalesReport};
use regex::Regex;
use serde::Deserialize;

/// Fewer tokens than this and we are almost certainly looking at an
/// unrelated document, so we bail out instead of decoding a zero report.
const MIN_TOKENS: usize = 10;

/// Display names for one branch slot in the schema.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchName {
    pub name: String,
    pub localized_name: String,
}

/// The positional contract between the report document and the decoder:
/// how many branches to expect, under which names, and in which channel
/// order. Each channel contributes two consecutive tokens (sales, orders);
/// the branches are followed by a fixed six-token website block.
///
/// Bump `version` whenever the document format changes — any deviation in
/// tokens-per-field silently shifts every subsequent field.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodeSchema {
    pub version: u32,
    pub branches: Vec<BranchName>,
    pub channels: Vec<ChannelKind>,
}

impl Default for DecodeSchema {
    fn default() -> Self {
        let branch = |name: &str, localized: &str| BranchName {
            name: name.to_string(),
            localized_name: localized.to_string(),
        };
        DecodeSchema {
            version: 1,
            branches: vec![
                branch("Maadi", "المعادي"),
                branch("Heliopolis", "مصر الجديدة"),
                branch("Tagamoa", "التجمع"),
                branch("Dark", "Dark Store"),
            ],
            channels: vec![ChannelKind::CallCentre, ChannelKind::Insta, ChannelKind::Talabat],
        }
    }
}

/// Pull every number out of the text, in order of appearance.
///
/// Matches one or more digits optionally followed by a decimal part — no
/// signs, no thousands separators, no exponents. Order is the only signal
/// the positional decoder gets, so nothing is deduplicated or filtered.
pub fn tokenize(text: &str) -> Vec<f64> {
    let re = Regex::new(r"\d+(?:\.\d+)?").unwrap();
    re.find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Ingestion entry point: raw extracted text → structured report.
///
/// Fails with `InsufficientData` when the text holds fewer than
/// `MIN_TOKENS` numbers; otherwise decoding is lenient and never fails
/// (missing trailing tokens read as zero).
pub fn decode_report(text: &str, schema: &DecodeSchema) -> Result<SalesReport, IngestError> {
    let tokens = tokenize(text);
    if tokens.len() < MIN_TOKENS {
        return Err(IngestError::InsufficientData {
            found: tokens.len(),
            min: MIN_TOKENS,
        });
    }
    Ok(positional::decode(&tokens, schema))
}
