pub mod banner;
pub mod pages;
pub mod sections;
pub mod segment;

use tracing::debug;

use crate::error::Result;
use banner::PlotInfo;
use sections::SubplotRecord;

/// One subplot record and the parcel its page banner named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSubplot {
    pub plot: PlotInfo,
    pub record: SubplotRecord,
}

/// Successful result of parsing a document. Empty outcomes are not faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// No page survived the layout contract, or they held no content lines.
    NoText,
    /// Content was present but no subplot marker was found.
    NoData,
    Parsed(Vec<ParsedSubplot>),
}

impl DocumentOutcome {
    pub fn subplots(&self) -> &[ParsedSubplot] {
        match self {
            DocumentOutcome::Parsed(subplots) => subplots,
            DocumentOutcome::NoText | DocumentOutcome::NoData => &[],
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            DocumentOutcome::NoText => "no_text",
            DocumentOutcome::NoData => "no_data",
            DocumentOutcome::Parsed(_) => "parsed",
        }
    }
}

/// Three-stage pipeline: pages → subplot chunks → records.
pub fn process_document<P, L>(page_texts: P, banner_line: usize) -> Result<DocumentOutcome>
where
    P: IntoIterator<Item = Vec<L>>,
    L: Into<String>,
{
    let stream = pages::collect_pages(page_texts, banner_line)?;
    if stream.lines.is_empty() {
        return Ok(DocumentOutcome::NoText);
    }

    let chunks = segment::split_subplots(&stream.lines);
    debug!(lines = stream.lines.len(), chunks = chunks.len(), "segmented line stream");

    let mut subplots = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let record = sections::build_record(chunk)?;
        let plot = stream.plot_of(&chunk[0]).clone();
        subplots.push(ParsedSubplot { plot, record });
    }

    if subplots.is_empty() {
        Ok(DocumentOutcome::NoData)
    } else {
        Ok(DocumentOutcome::Parsed(subplots))
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::input::split_pages;
    use pages::DEFAULT_BANNER_LINE;

    fn fixture(name: &str) -> Vec<Vec<String>> {
        let text = std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap();
        split_pages(&text)
    }

    fn page(banner: &str, body: &[&str]) -> Vec<String> {
        let mut lines = vec!["header".to_string(); DEFAULT_BANNER_LINE];
        lines.push(banner.to_string());
        lines.extend(body.iter().map(|l| l.to_string()));
        lines.push("footer".to_string());
        lines
    }

    #[test]
    fn single_subplot_document() {
        let doc = vec![page(
            "גוש 123 חלקה 45",
            &["תת חלקה 1", "label", "50 A 1/2", "בעלויות", "Owner X", "סוף נתונים"],
        )];
        let outcome = process_document(doc, DEFAULT_BANNER_LINE).unwrap();
        let subplots = outcome.subplots();
        assert_eq!(subplots.len(), 1);
        assert_eq!(subplots[0].plot.gush, "123");
        assert_eq!(subplots[0].plot.plot, "45");
        assert_eq!(subplots[0].record.ownerships, vec!["Owner X"]);
    }

    #[test]
    fn no_marker_is_no_data() {
        let doc = vec![page("גוש 1 חלקה 2", &["שורה", "סוף נתונים"])];
        assert_eq!(process_document(doc, DEFAULT_BANNER_LINE).unwrap(), DocumentOutcome::NoData);
    }

    #[test]
    fn empty_document_is_no_text() {
        let doc: Vec<Vec<String>> = vec![vec!["cover".into()]];
        assert_eq!(process_document(doc, DEFAULT_BANNER_LINE).unwrap(), DocumentOutcome::NoText);
    }

    #[test]
    fn subplot_spanning_pages_keeps_first_page_plot() {
        let doc = vec![
            page("גוש 10 חלקה 1", &["תת חלקה 1", "label", "50 A 1/2", "בעלויות"]),
            page("גוש 20 חלקה 2", &["Owner", "תת חלקה 2", "label", "60 B 1/3"]),
        ];
        let outcome = process_document(doc, DEFAULT_BANNER_LINE).unwrap();
        let subplots = outcome.subplots();
        assert_eq!(subplots.len(), 2);
        assert_eq!(subplots[0].plot.gush, "10");
        assert_eq!(subplots[0].record.ownerships, vec!["Owner"]);
        assert_eq!(subplots[1].plot.gush, "20");
    }

    #[test]
    fn malformed_subplot_faults_whole_document() {
        let doc = vec![page(
            "גוש 1 חלקה 2",
            &["תת חלקה 1", "label", "50 A 1/2", "תת חלקה 2", "label", "60"],
        )];
        let err = process_document(doc, DEFAULT_BANNER_LINE).unwrap_err();
        assert!(matches!(err, ParseError::FieldOutOfRange { ref subplot, .. } if subplot == "תת חלקה 2"));
    }

    #[test]
    fn sample_extract_fixture() {
        let outcome = process_document(fixture("sample_extract"), DEFAULT_BANNER_LINE).unwrap();
        let subplots = outcome.subplots();
        assert_eq!(subplots.len(), 3);

        let ids: Vec<&str> = subplots.iter().map(|s| s.record.subplot_id.as_str()).collect();
        assert_eq!(ids, vec!["תת חלקה 1", "תת חלקה 2", "תת חלקה 3"]);
        assert!(subplots.iter().all(|s| s.plot.gush == "6638" && s.plot.plot == "212"));

        let first = &subplots[0].record;
        assert_eq!(first.area_in_square_meters, "92.40");
        assert_eq!(first.floor_description, "קרקע");
        assert_eq!(first.share_in_common_property, "2/40");
        assert_eq!(first.ownerships.len(), 2);
        assert_eq!(first.mortgages, vec!["משכנתא מדרגה ראשונה בנק הפועלים בע\"מ 1/2"]);
        assert_eq!(first.linkage, vec!["א 1 חניה 12.50"]);

        // subplot 2 continues across the page break
        let second = &subplots[1].record;
        assert_eq!(second.ownerships, vec!["כהן דוד ת.ז 012345678 בעלות שלמות"]);
        assert_eq!(second.notes, vec!["הערת אזהרה סעיף 126 לטובת כהן רות"]);

        let third = &subplots[2].record;
        assert!(third.ownerships.is_empty());
        assert_eq!(third.lease, vec!["חכירה לדורות עד 2070"]);
    }
}
