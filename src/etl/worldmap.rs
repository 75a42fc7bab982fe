use crate::alarms::{AlarmRecord, SeriesSelector, extract};
use crate::output::{self, ChoroplethSeries, WORLD_MAP_HEADER};
use indexmap::IndexMap;
use tracing::debug;

struct CountryGroup<'a> {
    name: &'a str,
    sums: Vec<u64>,
}

/// Sum the selected counts keys per ISO3 country code.
///
/// Returns `None` when there is nothing to draw: no records, no selection,
/// or no selected key present on any record. Keys that exist but sum to zero
/// still produce a series.
pub fn etl<S: AsRef<str>>(alarms: &[AlarmRecord], selected: &[S]) -> Option<ChoroplethSeries> {
    if alarms.is_empty() || selected.is_empty() {
        return None;
    }

    let selectors: Vec<SeriesSelector> = selected
        .iter()
        .map(|key| SeriesSelector::from_counts_key(key.as_ref()))
        .collect();
    let any_present = alarms
        .iter()
        .any(|record| selectors.iter().any(|s| s.present_on(record)));
    if !any_present {
        debug!(selected = selectors.len(), "no selected category present in records");
        return None;
    }

    let mut countries: IndexMap<&str, CountryGroup> = IndexMap::new();
    for record in alarms {
        let group = countries
            .entry(record.country_iso_code3.as_str())
            .or_insert_with(|| CountryGroup {
                name: &record.country_name,
                sums: vec![0; selectors.len()],
            });
        for (i, selector) in selectors.iter().enumerate() {
            group.sums[i] = group.sums[i].saturating_add(extract(record, selector).total());
        }
    }

    let keys: Vec<&str> = selectors.iter().map(|s| s.key.as_str()).collect();
    let mut series = ChoroplethSeries {
        customdata: Vec::with_capacity(countries.len()),
        locations: Vec::with_capacity(countries.len()),
        z: Vec::with_capacity(countries.len()),
        text: Vec::with_capacity(countries.len()),
        hovertemplate: output::hover_template(WORLD_MAP_HEADER, &keys),
    };
    for (code, group) in countries {
        series.locations.push(code.to_string());
        series.z.push(group.sums.iter().fold(0, |acc: u64, &s| acc.saturating_add(s)));
        series.text.push(group.name.to_string());
        series.customdata.push(output::breakdown(&keys, &group.sums));
    }

    debug!(countries = series.locations.len(), "world-map aggregation done");
    Some(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(iso3: &str, name: &str, edges: Option<Vec<u64>>) -> AlarmRecord {
        AlarmRecord {
            country_iso_code3: iso3.into(),
            country_name: name.into(),
            edges_alarm_counts: edges,
            ..Default::default()
        }
    }

    #[test]
    fn sums_records_sharing_a_country() {
        let alarms = vec![
            record("CHL", "Chile", Some(vec![1, 2])),
            record("PER", "Peru", Some(vec![5])),
            record("CHL", "Chile", Some(vec![4])),
        ];
        let series = etl(&alarms, &["edges_alarm_counts"]).unwrap();
        assert_eq!(series.locations, ["CHL", "PER"]);
        assert_eq!(series.z, [7, 5]);
        assert_eq!(series.text, ["Chile", "Peru"]);
    }

    #[test]
    fn present_but_zero_still_renders() {
        let alarms = vec![record("CHL", "Chile", Some(vec![]))];
        let series = etl(&alarms, &["edges_alarm_counts"]).unwrap();
        assert_eq!(series.z, [0]);
        assert_eq!(series.customdata[0].get("edges_alarm_counts"), Some(&0));
    }

    #[test]
    fn absent_everywhere_is_none() {
        let alarms = vec![record("CHL", "Chile", None)];
        assert!(etl(&alarms, &["edges_alarm_counts"]).is_none());
    }

    #[test]
    fn mixed_known_and_unknown_keys() {
        let alarms = vec![record("CHL", "Chile", Some(vec![3]))];
        let series = etl(&alarms, &["bogus_alarm_counts", "edges_alarm_counts"]).unwrap();
        let fields: Vec<(&String, &u64)> = series.customdata[0].iter().collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], (&"bogus_alarm_counts".to_string(), &0));
        assert_eq!(fields[1], (&"edges_alarm_counts".to_string(), &3));
        assert_eq!(series.z, [3]);
        assert!(series.hovertemplate.contains("Bogus Alarm Counts"));
    }

    #[test]
    fn first_country_name_wins() {
        let alarms = vec![
            record("USA", "United States", Some(vec![1])),
            record("USA", "United States of America", Some(vec![1])),
        ];
        let series = etl(&alarms, &["edges_alarm_counts"]).unwrap();
        assert_eq!(series.text, ["United States"]);
        assert_eq!(series.z, [2]);
    }

    #[test]
    fn accepts_owned_keys() {
        let alarms = vec![record("CHL", "Chile", Some(vec![1]))];
        let selected = vec!["edges_alarm_counts".to_string()];
        assert!(etl(&alarms, &selected).is_some());
        assert!(etl::<String>(&alarms, &[]).is_none());
    }

    #[test]
    fn huge_counts_saturate() {
        let alarms = vec![
            record("CHL", "Chile", Some(vec![u64::MAX, 1])),
            record("CHL", "Chile", Some(vec![7])),
        ];
        let series = etl(&alarms, &["edges_alarm_counts", "edges_alarm_counts"]).unwrap();
        assert_eq!(series.z, [u64::MAX]);
        assert_eq!(series.customdata[0].get("edges_alarm_counts"), Some(&u64::MAX));
    }
}
