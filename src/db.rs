use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use rusqlite::Connection;

use crate::table::TableRow;

static SUBPLOT_NO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").unwrap());

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            id            INTEGER PRIMARY KEY,
            path          TEXT UNIQUE NOT NULL,
            status        TEXT NOT NULL CHECK(status IN ('parsed','no_text','no_data')),
            subplot_count INTEGER NOT NULL DEFAULT 0,
            imported_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS subplots (
            id            INTEGER PRIMARY KEY,
            document_id   INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            position      INTEGER NOT NULL,
            gush          TEXT NOT NULL,
            plot          TEXT NOT NULL,
            subplot       TEXT NOT NULL,
            subplot_no    INTEGER,
            area          TEXT NOT NULL,
            floor         TEXT NOT NULL,
            share         TEXT NOT NULL,
            ownerships    TEXT NOT NULL,
            linkage       TEXT NOT NULL,
            mortgages     TEXT NOT NULL,
            lease         TEXT NOT NULL,
            notes         TEXT NOT NULL,
            UNIQUE(document_id, position)
        );
        CREATE INDEX IF NOT EXISTS idx_subplots_parcel ON subplots(gush, plot);
        ",
    )?;
    Ok(())
}

/// Trailing number of a raw subplot header, e.g. `12` for `תת חלקה 12`.
pub fn subplot_number(subplot: &str) -> Option<i64> {
    SUBPLOT_NO_RE
        .captures_iter(subplot)
        .last()
        .and_then(|c| c[1].parse().ok())
}

// ── Import ──

/// Replace everything stored for `path` with `rows` in one transaction.
pub fn save_document(
    conn: &Connection,
    path: &str,
    status: &str,
    rows: &[TableRow],
) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM documents WHERE path = ?1", [path])?;
    tx.execute(
        "INSERT INTO documents (path, status, subplot_count, imported_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![path, status, rows.len(), chrono::Utc::now().to_rfc3339()],
    )?;
    let document_id = tx.last_insert_rowid();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO subplots
             (document_id, position, gush, plot, subplot, subplot_no, area, floor, share,
              ownerships, linkage, mortgages, lease, notes)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)",
        )?;
        for (position, r) in rows.iter().enumerate() {
            stmt.execute(rusqlite::params![
                document_id,
                position,
                r.gush,
                r.plot,
                r.subplot,
                subplot_number(&r.subplot),
                r.area_in_square_meters,
                r.floor_description,
                r.share_in_common_property,
                r.ownerships,
                r.linkage,
                r.mortgages,
                r.lease,
                r.notes,
            ])?;
        }
    }
    tx.commit()?;
    Ok(document_id)
}

// ── Overview ──

pub struct OverviewRow {
    pub gush: String,
    pub plot: String,
    pub subplot: String,
    pub area: String,
    pub floor: String,
    pub share: String,
    pub owners: usize,
    pub mortgages: usize,
}

pub fn fetch_overview(
    conn: &Connection,
    gush: Option<&str>,
    plot: Option<&str>,
    limit: usize,
) -> Result<Vec<OverviewRow>> {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(g) = gush {
        conditions.push(format!("gush = ?{}", params.len() + 1));
        params.push(Box::new(g.to_string()));
    }
    if let Some(p) = plot {
        conditions.push(format!("plot = ?{}", params.len() + 1));
        params.push(Box::new(p.to_string()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT gush, plot, subplot, area, floor, share, ownerships, mortgages
         FROM subplots{}
         ORDER BY gush, plot, subplot_no, position
         LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            let ownerships: String = row.get(6)?;
            let mortgages: String = row.get(7)?;
            Ok(OverviewRow {
                gush: row.get(0)?,
                plot: row.get(1)?,
                subplot: row.get(2)?,
                area: row.get(3)?,
                floor: row.get(4)?,
                share: row.get(5)?,
                owners: ownerships.lines().count(),
                mortgages: mortgages.lines().count(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub documents: usize,
    pub empty_documents: usize,
    pub subplots: usize,
    pub parcels: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let documents: usize = conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;
    let empty_documents: usize = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE status != 'parsed'",
        [],
        |r| r.get(0),
    )?;
    let subplots: usize = conn.query_row("SELECT COUNT(*) FROM subplots", [], |r| r.get(0))?;
    let parcels: usize = conn.query_row(
        "SELECT COUNT(*) FROM (SELECT DISTINCT gush, plot FROM subplots)",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        documents,
        empty_documents,
        subplots,
        parcels,
    })
}
