use tracing::{debug, warn};

use super::banner::{decode_banner, PlotInfo};
use crate::error::Result;

/// Line offset of the gush/plot banner from the top of every page.
pub const DEFAULT_BANNER_LINE: usize = 7;

/// A content line together with the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLine {
    pub page: usize,
    pub text: String,
}

impl AsRef<str> for PageLine {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Line stream of a whole document, ready for segmentation.
#[derive(Debug, Default)]
pub struct PageStream {
    /// Banner of each retained page, indexed by `PageLine::page`.
    pub plots: Vec<PlotInfo>,
    pub lines: Vec<PageLine>,
}

impl PageStream {
    pub fn plot_of(&self, line: &PageLine) -> &PlotInfo {
        &self.plots[line.page]
    }
}

/// Apply the page layout contract to already-extracted page texts.
///
/// Pages with no more lines than the banner offset are skipped. For the
/// rest, the banner line is decoded and only the lines strictly between the
/// banner and the page's last (footer) line are kept.
pub fn collect_pages<P, L>(pages: P, banner_line: usize) -> Result<PageStream>
where
    P: IntoIterator<Item = Vec<L>>,
    L: Into<String>,
{
    let mut stream = PageStream::default();

    for (number, page) in pages.into_iter().enumerate() {
        let mut lines: Vec<String> = page.into_iter().map(Into::into).collect();
        if lines.len() <= banner_line {
            warn!(page = number + 1, lines = lines.len(), "skipping page without banner");
            continue;
        }

        let plot = decode_banner(&lines[banner_line])?;
        debug!(page = number + 1, gush = %plot.gush, plot = %plot.plot, "page banner");

        lines.pop();
        let index = stream.plots.len();
        stream.plots.push(plot);
        stream.lines.extend(
            lines
                .into_iter()
                .skip(banner_line + 1)
                .map(|text| PageLine { page: index, text }),
        );
    }

    Ok(stream)
}
