//! Flat projection of parsed subplots for tabular output.

use crate::parser::banner::PlotInfo;
use crate::parser::sections::{Section, SubplotRecord};
use crate::parser::ParsedSubplot;

/// Joins the lines of a multi-line field into one cell.
const CELL_LINE_SEPARATOR: &str = "\n";

/// Output columns, declared in the document's canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Gush,
    Plot,
    Subplot,
    Area,
    Floor,
    Share,
    Ownerships,
    Linkage,
    Mortgages,
    Lease,
    Notes,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Gush,
        Column::Plot,
        Column::Subplot,
        Column::Area,
        Column::Floor,
        Column::Share,
        Column::Ownerships,
        Column::Linkage,
        Column::Mortgages,
        Column::Lease,
        Column::Notes,
    ];

    /// Stable machine name.
    pub fn key(self) -> &'static str {
        match self {
            Column::Gush => "gush",
            Column::Plot => "plot",
            Column::Subplot => "subplot",
            Column::Area => "area_in_square_meters",
            Column::Floor => "floor_description",
            Column::Share => "share_in_common_property",
            Column::Ownerships => "ownerships",
            Column::Linkage => "linkage",
            Column::Mortgages => "mortgages",
            Column::Lease => "lease",
            Column::Notes => "notes",
        }
    }

    /// Header shown to readers of the rendered table.
    pub fn label(self) -> &'static str {
        match self {
            Column::Gush => "גוש",
            Column::Plot => "חלקה",
            Column::Subplot => "תת חלקה",
            Column::Area => "שטח במ\"ר",
            Column::Floor => "תיאור קומה",
            Column::Share => "החלק ברכוש המשותף",
            Column::Ownerships => "בעלויות",
            Column::Linkage => "הצמדות",
            Column::Mortgages => "משכנתאות",
            Column::Lease => "חכירות",
            Column::Notes => "הערות",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub gush: String,
    pub plot: String,
    pub subplot: String,
    pub area_in_square_meters: String,
    pub floor_description: String,
    pub share_in_common_property: String,
    pub ownerships: String,
    pub linkage: String,
    pub mortgages: String,
    pub lease: String,
    pub notes: String,
}

impl TableRow {
    pub fn new(plot: &PlotInfo, record: &SubplotRecord) -> Self {
        TableRow {
            gush: plot.gush.clone(),
            plot: plot.plot.clone(),
            subplot: record.subplot_id.clone(),
            area_in_square_meters: record.area_in_square_meters.clone(),
            floor_description: record.floor_description.clone(),
            share_in_common_property: record.share_in_common_property.clone(),
            ownerships: join(record, Section::Ownerships),
            linkage: join(record, Section::Linkage),
            mortgages: join(record, Section::Mortgages),
            lease: join(record, Section::Lease),
            notes: join(record, Section::Notes),
        }
    }

    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Gush => &self.gush,
            Column::Plot => &self.plot,
            Column::Subplot => &self.subplot,
            Column::Area => &self.area_in_square_meters,
            Column::Floor => &self.floor_description,
            Column::Share => &self.share_in_common_property,
            Column::Ownerships => &self.ownerships,
            Column::Linkage => &self.linkage,
            Column::Mortgages => &self.mortgages,
            Column::Lease => &self.lease,
            Column::Notes => &self.notes,
        }
    }

    /// Cells in canonical column order.
    pub fn cells(&self) -> [&str; 11] {
        Column::ALL.map(|c| self.get(c))
    }
}

fn join(record: &SubplotRecord, section: Section) -> String {
    record.section(section).join(CELL_LINE_SEPARATOR)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: [Column; 11],
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn labels(&self) -> [&'static str; 11] {
        self.columns.map(Column::label)
    }

}

/// Project `(plot, record)` pairs into rows, one per record, in input order.
/// An empty input still yields a table with its full header.
pub fn assemble<'a, I>(subplots: I) -> Table
where
    I: IntoIterator<Item = (&'a PlotInfo, &'a SubplotRecord)>,
{
    Table {
        columns: Column::ALL,
        rows: subplots
            .into_iter()
            .map(|(plot, record)| TableRow::new(plot, record))
            .collect(),
    }
}

pub fn assemble_parsed(subplots: &[ParsedSubplot]) -> Table {
    assemble(subplots.iter().map(|s| (&s.plot, &s.record)))
}
