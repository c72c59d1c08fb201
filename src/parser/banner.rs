use crate::error::{token, ParseError, Result};

/// Parent parcel of every subplot on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotInfo {
    pub gush: String,
    pub plot: String,
}

/// Decode `<label> <gush> <label> <plot> ...`. Labels are not checked.
pub fn decode_banner(line: &str) -> Result<PlotInfo> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match (token(&tokens, 1), token(&tokens, 3)) {
        (Some(gush), Some(plot)) => Ok(PlotInfo {
            gush: gush.to_string(),
            plot: plot.to_string(),
        }),
        _ => Err(ParseError::BannerOutOfRange {
            line: line.to_string(),
            found: tokens.len(),
        }),
    }
}
