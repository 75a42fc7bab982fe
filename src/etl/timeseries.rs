use crate::alarms::{AlarmRecord, AttributeTriplet, SeriesSelector, extract};
use crate::config::DisplayConfig;
use crate::output::{
    self, ChartTrace, HoverInfo, TIME_SERIES_HEADER, TraceMode, TraceType, Visibility,
};
use indexmap::IndexMap;
use tracing::debug;

pub const AGGREGATE_TRACE_NAME: &str = "All";

/// Build the per-bin line traces: "All" first, then one per entity.
///
/// Without `country_name` the entities are countries; with it, the records
/// are narrowed to that country (exact, case-sensitive) and the entities are
/// its ASes. Entities contributing nothing are dropped, the rest are ordered
/// by descending total with ties kept in encounter order.
pub fn etl(
    alarms: &[AlarmRecord],
    selected: &[AttributeTriplet],
    country_name: Option<&str>,
    display: &DisplayConfig,
) -> Vec<ChartTrace> {
    if alarms.is_empty() || selected.is_empty() {
        return Vec::new();
    }

    let working: Vec<&AlarmRecord> = match country_name {
        Some(country) => alarms
            .iter()
            .filter(|r| r.country_name == country)
            .collect(),
        None => alarms.iter().collect(),
    };
    if working.is_empty() {
        debug!(country = ?country_name, "no records match country filter");
        return Vec::new();
    }

    let selectors: Vec<SeriesSelector> = selected.iter().map(SeriesSelector::from_triplet).collect();
    let keys: Vec<&str> = selectors.iter().map(|s| s.key.as_str()).collect();
    let hovertemplate = output::hover_template(TIME_SERIES_HEADER, &keys);
    let by_asn = country_name.is_some();

    let mut entities: IndexMap<&str, Vec<&AlarmRecord>> = IndexMap::new();
    for &record in &working {
        entities
            .entry(entity_name(record, by_asn))
            .or_default()
            .push(record);
    }

    let mut traces = Vec::with_capacity(entities.len() + 1);
    traces.push(build_trace(
        AGGREGATE_TRACE_NAME.to_string(),
        &working,
        &selectors,
        &keys,
        &hovertemplate,
        false,
    ));

    let mut entity_traces: Vec<ChartTrace> = entities
        .iter()
        .map(|(name, records)| {
            build_trace(
                output::truncate_name(name, display),
                records,
                &selectors,
                &keys,
                &hovertemplate,
                true,
            )
        })
        .filter(|t| t.total() > 0)
        .collect();
    // Stable: equal totals keep encounter order.
    entity_traces.sort_by(|a, b| b.total().cmp(&a.total()));
    traces.extend(entity_traces);

    debug!(
        records = working.len(),
        entities = entities.len(),
        traces = traces.len(),
        "time-series aggregation done"
    );
    traces
}

fn entity_name(record: &AlarmRecord, by_asn: bool) -> &str {
    if by_asn {
        &record.asn_name
    } else {
        &record.country_name
    }
}

/// Per-timebin sums, one slot per selector, sorted by timebin.
fn bin_sums<'a>(
    records: &[&'a AlarmRecord],
    selectors: &[SeriesSelector],
) -> IndexMap<&'a str, Vec<u64>> {
    let mut bins: IndexMap<&'a str, Vec<u64>> = IndexMap::new();
    for (i, selector) in selectors.iter().enumerate() {
        for &record in records {
            for event in extract(record, selector).events() {
                let sums = bins
                    .entry(event.timebin)
                    .or_insert_with(|| vec![0; selectors.len()]);
                sums[i] = sums[i].saturating_add(event.count);
            }
        }
    }
    // ISO-8601 UTC strings sort chronologically.
    bins.sort_keys();
    bins
}

fn build_trace(
    name: String,
    records: &[&AlarmRecord],
    selectors: &[SeriesSelector],
    keys: &[&str],
    hovertemplate: &str,
    entity: bool,
) -> ChartTrace {
    let bins = bin_sums(records, selectors);
    let mut x = Vec::with_capacity(bins.len());
    let mut y: Vec<u64> = Vec::with_capacity(bins.len());
    let mut customdata = Vec::with_capacity(bins.len());
    for (timebin, sums) in bins {
        x.push(timebin.to_string());
        y.push(sums.iter().fold(0, |acc: u64, &s| acc.saturating_add(s)));
        customdata.push(output::breakdown(keys, &sums));
    }

    ChartTrace {
        x,
        y,
        trace_type: TraceType::Scatter,
        mode: TraceMode::Lines,
        name,
        customdata,
        hovertemplate: hovertemplate.to_string(),
        visible: entity.then_some(Visibility::LegendOnly),
        hoverinfo: entity.then_some(HoverInfo::Hidden),
    }
}
