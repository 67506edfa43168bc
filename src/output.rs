use crate::error::Result;
use crate::lattice::LatticeSnapshot;
use crate::simulation::RunReport;
use std::fs;
use std::path::Path;

const OCCUPIED_MARKER: char = 'X';
const EMPTY_MARKER: char = '-';

/// Serialize the lattice as comma-separated 0/1 rows joined by newlines,
/// with no trailing newline
pub fn to_delimited(snapshot: &LatticeSnapshot) -> String {
    snapshot
        .to_bits()
        .iter()
        .map(|row| {
            row.iter()
                .map(|bit| bit.to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn write_delimited(snapshot: &LatticeSnapshot, path: &Path) -> Result<()> {
    fs::write(path, to_delimited(snapshot))?;
    Ok(())
}

/// Crude picture of the crystal, one line per row
pub fn render_text(snapshot: &LatticeSnapshot) -> String {
    let n = snapshot.size();
    let mut out = String::with_capacity(n * (n * 2 + 1));
    for x in 0..n {
        for y in 0..n {
            out.push(if snapshot.get(x, y) { OCCUPIED_MARKER } else { EMPTY_MARKER });
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// Export a run report as pretty JSON
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
