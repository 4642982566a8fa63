//! Followers report rows and their CSV rendering

use serde::Serialize;
use sqlx::FromRow;

/// Header line of the CSV export
pub const CSV_HEADER: &str = "destination,followers";

/// File name offered for the CSV download
pub const CSV_FILE_NAME: &str = "vacations-followers.csv";

/// Follower count for one vacation
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct FollowersReportRow {
    pub destination: String,
    pub followers: i64,
}

/// Render report rows as CSV: quoted destination, bare count, `\n` line ends.
pub fn render_csv(rows: &[FollowersReportRow]) -> String {
    let mut csv = String::with_capacity(CSV_HEADER.len() + 1 + rows.len() * 24);
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for row in rows {
        csv.push('"');
        csv.push_str(&row.destination.replace('"', "\"\""));
        csv.push_str("\",");
        csv.push_str(&row.followers.to_string());
        csv.push('\n');
    }

    csv
}
