use anyhow::Result;
use contracts::dashboards::d400_opportunity_analysis::{
    ExportTable, LobReportRow, ProducerReportRow,
};
use csv::Writer;

use super::service::OpportunityReport;

pub const LOB_HEADER: [&str; 3] = ["Opportunity Type", "LOB Category", "Count"];
pub const PRODUCER_HEADER: [&str; 4] = ["Producer", "Opportunity Type", "LOB Category", "Count"];

/// CSV body of the requested table; an empty Type is written as an empty cell
pub fn to_csv(report: &OpportunityReport, table: ExportTable) -> Result<String> {
    match table {
        ExportTable::Lob => lob_csv(&report.lob_rows),
        ExportTable::Producer => producer_csv(&report.producer_rows),
    }
}

pub fn lob_csv(rows: &[LobReportRow]) -> Result<String> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(LOB_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.opportunity_type.as_deref().unwrap_or(""),
            row.lob_category.as_str(),
            row.count.to_string().as_str(),
        ])?;
    }
    finish(wtr)
}

pub fn producer_csv(rows: &[ProducerReportRow]) -> Result<String> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(PRODUCER_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.producer.as_str(),
            row.opportunity_type.as_deref().unwrap_or(""),
            row.lob_category.as_str(),
            row.count.to_string().as_str(),
        ])?;
    }
    finish(wtr)
}

fn finish(wtr: Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}
