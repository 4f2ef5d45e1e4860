//! Parsing of user-supplied weights and impacts.
//!
//! Both arrive as comma-separated strings ("0.25,0.25,0.25,0.25" and
//! "+,+,+,-") from the CLI arguments or the web form and are parsed once,
//! up front, into the types the engine consumes.

use anyhow::{Context, Result};

use crate::engine::Impact;

/// Weights and impacts for every criterion column, length-matched at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    pub weights: Vec<f64>,
    pub impacts: Vec<Impact>,
}

impl Criteria {
    /// Parses both lists and rejects them early when their counts differ.
    ///
    /// Whether the counts match the data columns is only known once the
    /// table is loaded; the engine checks that separately.
    pub fn parse(weights: &str, impacts: &str) -> Result<Self> {
        let weights = parse_weights(weights)?;
        let impacts = parse_impacts(impacts)?;
        if weights.len() != impacts.len() {
            anyhow::bail!(
                "got {} weights but {} impacts, counts must match",
                weights.len(),
                impacts.len()
            );
        }
        Ok(Self { weights, impacts })
    }
}

/// Splits on commas and parses each token as a float. Tokens may carry
/// surrounding whitespace. Values are taken as given, including negatives;
/// the ranking math does not require them to sum to one.
pub fn parse_weights(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(str::trim)
        .map(|tok| {
            tok.parse::<f64>()
                .with_context(|| format!("invalid weight {tok:?}, expected a number"))
        })
        .collect()
}

/// Splits on commas and maps each token to an [`Impact`]. Only "+" and "-"
/// are accepted.
pub fn parse_impacts(s: &str) -> Result<Vec<Impact>> {
    s.split(',')
        .map(str::trim)
        .map(|tok| match tok {
            "+" => Ok(Impact::Benefit),
            "-" => Ok(Impact::Cost),
            other => anyhow::bail!("invalid impact {other:?}, expected \"+\" or \"-\""),
        })
        .collect()
}
