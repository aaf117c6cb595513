//! Historical data export.
//!
//! Runs the same pipeline the dashboard charts use (fetch, filter to the
//! window, reshape) and writes the result as a dense matrix: one row per
//! date, one column per series, empty cells where a series has no point.

use anyhow::{anyhow, bail};
use clap::ValueEnum;
use co2_core::client::ApiClient;
use co2_core::date_range::{windows, DateRange};
use co2_core::historical::{
    CicdRecord, CrossProjectRecord, HistoricalQuery, HistoricalView, InfrastructureRecord,
    OperationsRecord, PipelineRecord, SdlcRecord,
};
use co2_data::filter::filter;
use co2_data::reshape::{reshape, Reshaped, SeriesRecord, TimeSeriesRecord};
use co2_utils::dates::{format_timestamp, parse_date};
use log::info;
use serde::de::DeserializeOwned;
use std::io::Write;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryKind {
    CrossProject,
    Sdlc,
    Operations,
    Cicd,
    Service,
    Pipeline,
}

impl HistoryKind {
    /// The endpoint to query; `service` and `pipeline` need an id.
    pub fn view(self, id: Option<u64>) -> anyhow::Result<HistoricalView> {
        let needs_id = |kind: &str| anyhow!("--id is required for {} history", kind);
        Ok(match self {
            HistoryKind::CrossProject => HistoricalView::CrossProject,
            HistoryKind::Sdlc => HistoricalView::Sdlc,
            HistoryKind::Operations => HistoricalView::Operations,
            HistoryKind::Cicd => HistoricalView::Cicd,
            HistoryKind::Service => HistoricalView::Service(id.ok_or_else(|| needs_id("service"))?),
            HistoryKind::Pipeline => {
                HistoricalView::Pipeline(id.ok_or_else(|| needs_id("pipeline"))?)
            }
        })
    }
}

/// Whole days from `start` through `end`, defaulting to the reporting window.
pub fn parse_range(start: Option<&str>, end: Option<&str>) -> anyhow::Result<DateRange> {
    let mut range = windows::reporting();
    if let Some(start) = start {
        range = range.with_start_day(parse_date(start)?);
    }
    if let Some(end) = end {
        range = range.with_end_day(parse_date(end)?);
    }
    if range.is_empty() {
        bail!("start date must come before end date");
    }
    Ok(range)
}

/// Write `reshaped` as `date,<series...>` CSV.
pub fn write_matrix_csv<W: Write>(reshaped: &Reshaped, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["date".to_string()];
    header.extend(reshaped.labels());
    wtr.write_record(&header)?;

    for (i, date) in reshaped.dates.iter().enumerate() {
        let mut row = vec![format_timestamp(date)];
        for series in &reshaped.series {
            let cell = series
                .points
                .get(i)
                .and_then(|p| p.value)
                .map(|v| v.to_string())
                .unwrap_or_default();
            row.push(cell);
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

async fn fetch_series<R>(client: &ApiClient, query: &HistoricalQuery) -> anyhow::Result<Vec<TimeSeriesRecord>>
where
    R: DeserializeOwned + SeriesRecord,
{
    let records: Vec<R> = client.history(query).await?;
    Ok(records.iter().map(TimeSeriesRecord::from_record).collect())
}

pub async fn run_export(
    client: &ApiClient,
    view: HistoricalView,
    range: DateRange,
    tags: Vec<String>,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let query = HistoricalQuery::new(view, range).with_tags(tags);
    info!(
        "Fetching {} from {} to {}",
        view.path(),
        format_timestamp(&range.start),
        format_timestamp(&range.end)
    );

    let records = match view {
        HistoricalView::CrossProject => fetch_series::<CrossProjectRecord>(client, &query).await?,
        HistoricalView::Sdlc => fetch_series::<SdlcRecord>(client, &query).await?,
        HistoricalView::Operations => fetch_series::<OperationsRecord>(client, &query).await?,
        HistoricalView::Cicd => fetch_series::<CicdRecord>(client, &query).await?,
        HistoricalView::Service(_) => fetch_series::<InfrastructureRecord>(client, &query).await?,
        HistoricalView::Pipeline(_) => fetch_series::<PipelineRecord>(client, &query).await?,
    };

    let kept = filter(&records, &range);
    let reshaped = reshape(&kept);
    info!(
        "{} of {} records in window, {} series over {} dates",
        kept.len(),
        records.len(),
        reshaped.series.len(),
        reshaped.dates.len()
    );

    match output {
        Some(path) => {
            write_matrix_csv(&reshaped, std::fs::File::create(path)?)?;
            info!("Export complete. Output: {}", path);
        }
        None => write_matrix_csv(&reshaped, std::io::stdout().lock())?,
    }
    Ok(())
}
