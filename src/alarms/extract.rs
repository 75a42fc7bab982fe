use super::types::{AlarmCategory, AlarmField, AlarmRecord};
use indexmap::IndexMap;

/// Caller-facing `[counts, timebins, severities]` key triplet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTriplet {
    pub counts: String,
    pub timebins: String,
    pub severities: String,
}

impl AttributeTriplet {
    pub fn new(
        counts: impl Into<String>,
        timebins: impl Into<String>,
        severities: impl Into<String>,
    ) -> Self {
        Self {
            counts: counts.into(),
            timebins: timebins.into(),
            severities: severities.into(),
        }
    }

    pub fn for_category(category: AlarmCategory) -> Self {
        Self::new(
            category.counts_key(),
            category.timebins_key(),
            category.severities_key(),
        )
    }
}

impl From<[&str; 3]> for AttributeTriplet {
    fn from([counts, timebins, severities]: [&str; 3]) -> Self {
        Self::new(counts, timebins, severities)
    }
}

/// A selection resolved once per call to typed record accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSelector {
    /// Raw counts key, used for breakdown fields and hover labels.
    pub key: String,
    counts: Option<AlarmCategory>,
    timebins: Option<AlarmCategory>,
    severities: Option<AlarmCategory>,
}

fn resolve(key: &str, field: AlarmField) -> Option<AlarmCategory> {
    match AlarmCategory::from_field_key(key) {
        Some((category, f)) if f == field => Some(category),
        _ => None,
    }
}

impl SeriesSelector {
    pub fn from_triplet(triplet: &AttributeTriplet) -> Self {
        Self {
            key: triplet.counts.clone(),
            counts: resolve(&triplet.counts, AlarmField::Counts),
            timebins: resolve(&triplet.timebins, AlarmField::Timebins),
            severities: resolve(&triplet.severities, AlarmField::Severities),
        }
    }

    /// Selector that only needs counts (no time axis).
    pub fn from_counts_key(key: &str) -> Self {
        let category = resolve(key, AlarmField::Counts);
        Self {
            key: key.to_string(),
            counts: category,
            timebins: category,
            severities: category,
        }
    }

    /// Whether `record` carries the counts key at all.
    pub fn present_on(&self, record: &AlarmRecord) -> bool {
        self.counts.is_some_and(|c| record.has_counts(c))
    }
}

/// Borrowed view of one category's parallel sequences on one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlarmSeries<'a> {
    pub counts: &'a [u64],
    pub timebins: &'a [String],
    pub severities: &'a [String],
}

/// One alarm event: index `i` across the three sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmEvent<'a> {
    pub count: u64,
    pub timebin: &'a str,
    pub severity: Option<&'a str>,
}

impl<'a> AlarmSeries<'a> {
    /// Events in timebin order; a count missing at an index reads as 0.
    pub fn events(self) -> impl Iterator<Item = AlarmEvent<'a>> {
        let counts = self.counts;
        let severities = self.severities;
        self.timebins.iter().enumerate().map(move |(i, timebin)| AlarmEvent {
            count: counts.get(i).copied().unwrap_or(0),
            timebin: timebin.as_str(),
            severity: severities.get(i).map(String::as_str),
        })
    }

    /// Sum of the counts sequence, ignoring timebins. Saturates at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0, |acc, &c| acc.saturating_add(c))
    }

    /// Summed counts per severity label, in first-seen order.
    pub fn severity_histogram(&self) -> IndexMap<&'a str, u64> {
        let mut histogram = IndexMap::new();
        for (i, &count) in self.counts.iter().enumerate() {
            let label = self.severities.get(i).map_or("unknown", String::as_str);
            let slot = histogram.entry(label).or_insert(0u64);
            *slot = slot.saturating_add(count);
        }
        histogram
    }
}

/// Read the selected category's sequences off `record`, empty when absent.
pub fn extract<'a>(record: &'a AlarmRecord, selector: &SeriesSelector) -> AlarmSeries<'a> {
    AlarmSeries {
        counts: selector
            .counts
            .and_then(|c| record.counts(c))
            .unwrap_or_default(),
        timebins: selector
            .timebins
            .and_then(|c| record.timebins(c))
            .unwrap_or_default(),
        severities: selector
            .severities
            .and_then(|c| record.severities(c))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn romania() -> AlarmRecord {
        serde_json::from_value(serde_json::json!({
            "asn": "34469",
            "asn_name": "CONNETRO-AS CONNET - RO SRL",
            "country_name": "Romania",
            "hegemony_alarm_counts": [1, 1, 1],
            "hegemony_alarm_timebins": [
                "2023-08-10T00:00:00Z",
                "2023-08-10T00:00:00Z",
                "2023-08-10T00:15:00Z"
            ],
            "hegemony_alarm_severities": ["high", "low", "high"],
            "moas_alarm_counts": [4, 2],
            "moas_alarm_timebins": ["2023-08-10T01:00:00Z"],
        }))
        .unwrap()
    }

    #[test]
    fn extracts_present_category() {
        let record = romania();
        let selector =
            SeriesSelector::from_triplet(&AttributeTriplet::for_category(AlarmCategory::Hegemony));
        let series = extract(&record, &selector);
        assert_eq!(series.counts, &[1, 1, 1]);
        assert_eq!(series.timebins.len(), 3);
        assert_eq!(series.severities.len(), 3);
        assert_eq!(series.total(), 3);
    }

    #[test]
    fn missing_category_is_empty() {
        let record = romania();
        let selector =
            SeriesSelector::from_triplet(&AttributeTriplet::for_category(AlarmCategory::Bgp));
        let series = extract(&record, &selector);
        assert_eq!(series, AlarmSeries::default());
        assert_eq!(series.events().count(), 0);
        assert_eq!(series.total(), 0);
    }

    #[test]
    fn unknown_keys_are_empty() {
        let record = romania();
        let selector = SeriesSelector::from_triplet(&AttributeTriplet::from(["a", "b", "c"]));
        assert_eq!(selector.counts, None);
        assert_eq!(extract(&record, &selector), AlarmSeries::default());
        assert!(!selector.present_on(&record));
    }

    #[test]
    fn mismatched_field_kinds_do_not_resolve() {
        let selector = SeriesSelector::from_triplet(&AttributeTriplet::from([
            "hegemony_alarm_timebins",
            "hegemony_alarm_timebins",
            "hegemony_alarm_severities",
        ]));
        assert_eq!(selector.counts, None);
        let record = romania();
        let series = extract(&record, &selector);
        assert!(series.counts.is_empty());
        assert_eq!(series.timebins.len(), 3);
    }

    #[test]
    fn events_tolerate_short_sequences() {
        let record = romania();
        let selector = SeriesSelector::from_counts_key("moas_alarm_counts");
        let series = extract(&record, &selector);
        let events: Vec<_> = series.events().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].count, 4);
        assert_eq!(events[0].severity, None);
        // Total still covers every count, binned or not.
        assert_eq!(series.total(), 6);
    }

    #[test]
    fn severity_histogram_sums_counts() {
        let record = romania();
        let selector = SeriesSelector::from_counts_key("hegemony_alarm_counts");
        let histogram = extract(&record, &selector).severity_histogram();
        assert_eq!(histogram.get("high"), Some(&2));
        assert_eq!(histogram.get("low"), Some(&1));
        assert_eq!(histogram.keys().copied().collect::<Vec<_>>(), vec!["high", "low"]);
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let record: AlarmRecord = serde_json::from_value(serde_json::json!({
            "bgp_alarm_counts": [u64::MAX, 1],
            "bgp_alarm_timebins": ["2023-08-10T00:00:00Z", "2023-08-10T00:00:00Z"],
            "bgp_alarm_severities": ["high", "high"],
        }))
        .unwrap();
        let series = extract(&record, &SeriesSelector::from_counts_key("bgp_alarm_counts"));
        assert_eq!(series.total(), u64::MAX);
        assert_eq!(series.severity_histogram().get("high"), Some(&u64::MAX));
    }
}
