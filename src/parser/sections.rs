use crate::error::{token, ParseError, Result};

/// Row 2 of a chunk: area, floor description, common-property share.
const FIXED_FIELDS_LINE: usize = 2;
const FIXED_FIELD_COUNT: usize = 3;
/// Section headers are searched from here on.
const SECTIONS_START: usize = 3;

/// Column caption the linkage table repeats inside its own body.
pub const LINKAGE_CAPTION: &str = "סימון בתשריט צבע בתשריט תיאור הצמדה שטח במ\"ר";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Ownerships,
    Mortgages,
    Linkage,
    Lease,
    Notes,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Ownerships,
        Section::Mortgages,
        Section::Linkage,
        Section::Lease,
        Section::Notes,
    ];

    /// Exact header line that opens this section.
    pub fn header(self) -> &'static str {
        match self {
            Section::Ownerships => "בעלויות",
            Section::Mortgages => "משכנתאות",
            Section::Linkage => "הצמדות",
            Section::Lease => "חכירות",
            Section::Notes => "הערות",
        }
    }

    pub fn from_header(line: &str) -> Option<Section> {
        Self::ALL.into_iter().find(|s| s.header() == line)
    }

    fn keeps(self, line: &str) -> bool {
        !(self == Section::Linkage && line == LINKAGE_CAPTION)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubplotRecord {
    /// Raw header line, e.g. `תת חלקה 12`.
    pub subplot_id: String,
    pub area_in_square_meters: String,
    pub floor_description: String,
    pub share_in_common_property: String,
    pub ownerships: Vec<String>,
    pub mortgages: Vec<String>,
    pub linkage: Vec<String>,
    pub lease: Vec<String>,
    pub notes: Vec<String>,
}

impl SubplotRecord {
    pub fn section(&self, section: Section) -> &[String] {
        match section {
            Section::Ownerships => &self.ownerships,
            Section::Mortgages => &self.mortgages,
            Section::Linkage => &self.linkage,
            Section::Lease => &self.lease,
            Section::Notes => &self.notes,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Ownerships => &mut self.ownerships,
            Section::Mortgages => &mut self.mortgages,
            Section::Linkage => &mut self.linkage,
            Section::Lease => &mut self.lease,
            Section::Notes => &mut self.notes,
        }
    }
}

/// Parse one subplot chunk as produced by `segment::split_subplots`.
///
/// Lines after the fixed fields are lexed into labelled regions: a header
/// line switches the open section, and the lines gathered since the previous
/// header are stored under that previous section. Lines before the first
/// header are dropped. A repeated header replaces the earlier content.
pub fn build_record<T: AsRef<str>>(chunk: &[T]) -> Result<SubplotRecord> {
    let subplot_id = chunk
        .first()
        .map(|l| l.as_ref().to_string())
        .unwrap_or_default();
    let fixed_line = chunk.get(FIXED_FIELDS_LINE).map(|l| l.as_ref());
    let [area, floor, share] = fixed_fields(&subplot_id, fixed_line)?;

    let mut record = SubplotRecord {
        subplot_id,
        area_in_square_meters: area.to_string(),
        floor_description: floor.to_string(),
        share_in_common_property: share.to_string(),
        ..Default::default()
    };

    let mut current: Option<Section> = None;
    let mut pending: Vec<&str> = Vec::new();
    for line in chunk.iter().skip(SECTIONS_START).map(|l| l.as_ref()) {
        match Section::from_header(line) {
            Some(next) => {
                flush(&mut record, current, &mut pending);
                current = Some(next);
            }
            None => pending.push(line),
        }
    }
    flush(&mut record, current, &mut pending);

    Ok(record)
}

fn fixed_fields<'a>(subplot: &str, line: Option<&'a str>) -> Result<[&'a str; FIXED_FIELD_COUNT]> {
    let tokens: Vec<&str> = line.map(|l| l.split_whitespace().collect()).unwrap_or_default();
    match (token(&tokens, 0), token(&tokens, 1), token(&tokens, 2)) {
        (Some(area), Some(floor), Some(share)) => Ok([area, floor, share]),
        _ => Err(ParseError::FieldOutOfRange {
            subplot: subplot.to_string(),
            line: line.map(str::to_string),
            found: tokens.len(),
            needed: FIXED_FIELD_COUNT,
        }),
    }
}

fn flush(record: &mut SubplotRecord, section: Option<Section>, pending: &mut Vec<&str>) {
    let lines = std::mem::take(pending);
    let Some(section) = section else {
        return;
    };
    *record.section_mut(section) = lines
        .into_iter()
        .filter(|l| section.keeps(l))
        .map(str::to_string)
        .collect();
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(tail: &[&str]) -> Vec<String> {
        let mut lines = vec![
            "תת חלקה 3".to_string(),
            "שטח במ\"ר תיאור קומה החלק ברכוש המשותף".to_string(),
            "84.20 קומה 1/40".to_string(),
        ];
        lines.extend(tail.iter().map(|l| l.to_string()));
        lines
    }

    #[test]
    fn reads_fixed_fields() {
        let r = build_record(&chunk(&[])).unwrap();
        assert_eq!(r.subplot_id, "תת חלקה 3");
        assert_eq!(r.area_in_square_meters, "84.20");
        assert_eq!(r.floor_description, "קומה");
        assert_eq!(r.share_in_common_property, "1/40");
    }

    #[test]
    fn extra_fixed_tokens_are_ignored() {
        let lines = ["תת חלקה 1", "label", "50 A 1/2 extra tokens"];
        let r = build_record(&lines).unwrap();
        assert_eq!(r.share_in_common_property, "1/2");
    }

    #[test]
    fn no_headers_leaves_sections_empty() {
        let r = build_record(&chunk(&["noise", "more noise"])).unwrap();
        for section in Section::ALL {
            assert!(r.section(section).is_empty(), "{section:?}");
        }
    }

    #[test]
    fn sections_keep_order() {
        let r = build_record(&chunk(&[
            "בעלויות",
            "ישראל ישראלי",
            "שרה ישראלי",
            "משכנתאות",
            "בנק לאומי",
            "הערות",
            "הערת אזהרה",
        ]))
        .unwrap();
        assert_eq!(r.ownerships, vec!["ישראל ישראלי", "שרה ישראלי"]);
        assert_eq!(r.mortgages, vec!["בנק לאומי"]);
        assert_eq!(r.notes, vec!["הערת אזהרה"]);
        assert!(r.linkage.is_empty());
        assert!(r.lease.is_empty());
    }

    #[test]
    fn lines_before_first_header_are_dropped() {
        let r = build_record(&chunk(&["interstitial", "בעלויות", "owner"])).unwrap();
        assert_eq!(r.ownerships, vec!["owner"]);
    }

    #[test]
    fn last_line_belongs_to_last_section() {
        let r = build_record(&["תת חלקה 1", "label", "50 A 1/2", "בעלויות", "Owner X"]).unwrap();
        assert_eq!(r.ownerships, vec!["Owner X"]);
    }

    #[test]
    fn header_on_first_section_line_is_recognised() {
        // Index 3 is the first line scanned for headers.
        let r = build_record(&chunk(&["חכירות", "lease A"])).unwrap();
        assert_eq!(r.lease, vec!["lease A"]);
    }

    #[test]
    fn repeated_header_overwrites() {
        let r = build_record(&chunk(&[
            "בעלויות", "first", "other", "הערות", "n", "בעלויות", "second",
        ]))
        .unwrap();
        assert_eq!(r.ownerships, vec!["second"]);
        assert_eq!(r.notes, vec!["n"]);
    }

    #[test]
    fn trailing_header_clears_section() {
        let r = build_record(&chunk(&["הערות", "n", "הערות"])).unwrap();
        assert!(r.notes.is_empty());
    }

    #[test]
    fn linkage_caption_is_filtered() {
        let r = build_record(&chunk(&[
            "הצמדות",
            LINKAGE_CAPTION,
            "חניה א 12",
            LINKAGE_CAPTION,
            "מחסן ב 4",
        ]))
        .unwrap();
        assert_eq!(r.linkage, vec!["חניה א 12", "מחסן ב 4"]);
    }

    #[test]
    fn caption_outside_linkage_is_kept() {
        let r = build_record(&chunk(&["הערות", LINKAGE_CAPTION])).unwrap();
        assert_eq!(r.notes, vec![LINKAGE_CAPTION]);
    }

    #[test]
    fn header_match_is_exact() {
        let r = build_record(&chunk(&[" בעלויות", "בעלויות:", "x"])).unwrap();
        assert!(r.ownerships.is_empty());
    }

    #[test]
    fn short_fixed_row_faults() {
        let err = build_record(&["תת חלקה 1", "label", "50 A"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::FieldOutOfRange {
                subplot: "תת חלקה 1".into(),
                line: Some("50 A".into()),
                found: 2,
                needed: 3,
            }
        );
    }

    #[test]
    fn missing_fixed_row_faults() {
        let err = build_record(&["תת חלקה 1", "label"]).unwrap_err();
        assert!(matches!(err, ParseError::FieldOutOfRange { line: None, found: 0, .. }));
    }

    #[test]
    fn header_lookup() {
        for section in Section::ALL {
            assert_eq!(Section::from_header(section.header()), Some(section));
        }
        assert_eq!(Section::from_header("שטח"), None);
    }
}
