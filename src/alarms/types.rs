use serde::{Deserialize, Deserializer, Serialize};

/// One of the nine alarm signal families carried on every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmCategory {
    Hegemony,
    NetworkDelay,
    Moas,
    Submoas,
    Defcon,
    Edges,
    PingSlash24,
    Bgp,
    UcsdNt,
}

/// Which of the three parallel sequences a field key points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmField {
    Counts,
    Timebins,
    Severities,
}

struct CategoryKeys {
    category: AlarmCategory,
    prefix: &'static str,
    counts: &'static str,
    timebins: &'static str,
    severities: &'static str,
}

static CATEGORY_KEYS: &[CategoryKeys] = &[
    CategoryKeys {
        category: AlarmCategory::Hegemony,
        prefix: "hegemony",
        counts: "hegemony_alarm_counts",
        timebins: "hegemony_alarm_timebins",
        severities: "hegemony_alarm_severities",
    },
    CategoryKeys {
        category: AlarmCategory::NetworkDelay,
        prefix: "network_delay",
        counts: "network_delay_alarm_counts",
        timebins: "network_delay_alarm_timebins",
        severities: "network_delay_alarm_severities",
    },
    CategoryKeys {
        category: AlarmCategory::Moas,
        prefix: "moas",
        counts: "moas_alarm_counts",
        timebins: "moas_alarm_timebins",
        severities: "moas_alarm_severities",
    },
    CategoryKeys {
        category: AlarmCategory::Submoas,
        prefix: "submoas",
        counts: "submoas_alarm_counts",
        timebins: "submoas_alarm_timebins",
        severities: "submoas_alarm_severities",
    },
    CategoryKeys {
        category: AlarmCategory::Defcon,
        prefix: "defcon",
        counts: "defcon_alarm_counts",
        timebins: "defcon_alarm_timebins",
        severities: "defcon_alarm_severities",
    },
    CategoryKeys {
        category: AlarmCategory::Edges,
        prefix: "edges",
        counts: "edges_alarm_counts",
        timebins: "edges_alarm_timebins",
        severities: "edges_alarm_severities",
    },
    CategoryKeys {
        category: AlarmCategory::PingSlash24,
        prefix: "ping_slash24",
        counts: "ping_slash24_alarm_counts",
        timebins: "ping_slash24_alarm_timebins",
        severities: "ping_slash24_alarm_severities",
    },
    CategoryKeys {
        category: AlarmCategory::Bgp,
        prefix: "bgp",
        counts: "bgp_alarm_counts",
        timebins: "bgp_alarm_timebins",
        severities: "bgp_alarm_severities",
    },
    CategoryKeys {
        category: AlarmCategory::UcsdNt,
        prefix: "ucsd_nt",
        counts: "ucsd_nt_alarm_counts",
        timebins: "ucsd_nt_alarm_timebins",
        severities: "ucsd_nt_alarm_severities",
    },
];

impl AlarmCategory {
    pub const ALL: [Self; 9] = [
        Self::Hegemony,
        Self::NetworkDelay,
        Self::Moas,
        Self::Submoas,
        Self::Defcon,
        Self::Edges,
        Self::PingSlash24,
        Self::Bgp,
        Self::UcsdNt,
    ];

    fn keys(self) -> &'static CategoryKeys {
        // Table rows are declared in enum order.
        &CATEGORY_KEYS[self as usize]
    }

    /// Field-name prefix, e.g. `network_delay`.
    pub fn prefix(self) -> &'static str {
        self.keys().prefix
    }

    pub fn counts_key(self) -> &'static str {
        self.keys().counts
    }

    pub fn timebins_key(self) -> &'static str {
        self.keys().timebins
    }

    pub fn severities_key(self) -> &'static str {
        self.keys().severities
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        CATEGORY_KEYS
            .iter()
            .find(|k| k.prefix == prefix)
            .map(|k| k.category)
    }

    pub fn from_counts_key(key: &str) -> Option<Self> {
        match Self::from_field_key(key) {
            Some((category, AlarmField::Counts)) => Some(category),
            _ => None,
        }
    }

    /// Resolve any of the 27 record field keys to its category and field.
    pub fn from_field_key(key: &str) -> Option<(Self, AlarmField)> {
        CATEGORY_KEYS.iter().find_map(|k| {
            if k.counts == key {
                Some((k.category, AlarmField::Counts))
            } else if k.timebins == key {
                Some((k.category, AlarmField::Timebins))
            } else if k.severities == key {
                Some((k.category, AlarmField::Severities))
            } else {
                None
            }
        })
    }
}

impl std::fmt::Display for AlarmCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hegemony => write!(f, "Hegemony"),
            Self::NetworkDelay => write!(f, "Network Delay"),
            Self::Moas => write!(f, "MOAS"),
            Self::Submoas => write!(f, "Sub-MOAS"),
            Self::Defcon => write!(f, "DEFCON"),
            Self::Edges => write!(f, "Edges"),
            Self::PingSlash24 => write!(f, "Ping /24"),
            Self::Bgp => write!(f, "BGP"),
            Self::UcsdNt => write!(f, "UCSD Network Telescope"),
        }
    }
}

/// One AS (optionally country-scoped) with its alarm history.
///
/// Each category carries three parallel sequences; `None` means the key was
/// absent from the source document, which matters to the world-map view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlarmRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub asn: String,
    #[serde(default)]
    pub asn_name: String,
    #[serde(default)]
    pub country_iso_code2: String,
    #[serde(default)]
    pub country_iso_code3: String,
    #[serde(default)]
    pub country_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hegemony_alarm_counts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hegemony_alarm_timebins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hegemony_alarm_severities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_delay_alarm_counts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_delay_alarm_timebins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_delay_alarm_severities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moas_alarm_counts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moas_alarm_timebins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moas_alarm_severities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submoas_alarm_counts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submoas_alarm_timebins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submoas_alarm_severities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defcon_alarm_counts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defcon_alarm_timebins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defcon_alarm_severities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges_alarm_counts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges_alarm_timebins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges_alarm_severities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping_slash24_alarm_counts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping_slash24_alarm_timebins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping_slash24_alarm_severities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgp_alarm_counts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgp_alarm_timebins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgp_alarm_severities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ucsd_nt_alarm_counts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ucsd_nt_alarm_timebins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ucsd_nt_alarm_severities: Option<Vec<String>>,
}

impl AlarmRecord {
    pub fn counts(&self, category: AlarmCategory) -> Option<&[u64]> {
        let field = match category {
            AlarmCategory::Hegemony => &self.hegemony_alarm_counts,
            AlarmCategory::NetworkDelay => &self.network_delay_alarm_counts,
            AlarmCategory::Moas => &self.moas_alarm_counts,
            AlarmCategory::Submoas => &self.submoas_alarm_counts,
            AlarmCategory::Defcon => &self.defcon_alarm_counts,
            AlarmCategory::Edges => &self.edges_alarm_counts,
            AlarmCategory::PingSlash24 => &self.ping_slash24_alarm_counts,
            AlarmCategory::Bgp => &self.bgp_alarm_counts,
            AlarmCategory::UcsdNt => &self.ucsd_nt_alarm_counts,
        };
        field.as_deref()
    }

    pub fn timebins(&self, category: AlarmCategory) -> Option<&[String]> {
        let field = match category {
            AlarmCategory::Hegemony => &self.hegemony_alarm_timebins,
            AlarmCategory::NetworkDelay => &self.network_delay_alarm_timebins,
            AlarmCategory::Moas => &self.moas_alarm_timebins,
            AlarmCategory::Submoas => &self.submoas_alarm_timebins,
            AlarmCategory::Defcon => &self.defcon_alarm_timebins,
            AlarmCategory::Edges => &self.edges_alarm_timebins,
            AlarmCategory::PingSlash24 => &self.ping_slash24_alarm_timebins,
            AlarmCategory::Bgp => &self.bgp_alarm_timebins,
            AlarmCategory::UcsdNt => &self.ucsd_nt_alarm_timebins,
        };
        field.as_deref()
    }

    pub fn severities(&self, category: AlarmCategory) -> Option<&[String]> {
        let field = match category {
            AlarmCategory::Hegemony => &self.hegemony_alarm_severities,
            AlarmCategory::NetworkDelay => &self.network_delay_alarm_severities,
            AlarmCategory::Moas => &self.moas_alarm_severities,
            AlarmCategory::Submoas => &self.submoas_alarm_severities,
            AlarmCategory::Defcon => &self.defcon_alarm_severities,
            AlarmCategory::Edges => &self.edges_alarm_severities,
            AlarmCategory::PingSlash24 => &self.ping_slash24_alarm_severities,
            AlarmCategory::Bgp => &self.bgp_alarm_severities,
            AlarmCategory::UcsdNt => &self.ucsd_nt_alarm_severities,
        };
        field.as_deref()
    }

    /// Whether the counts key for `category` was present on the record at all.
    pub fn has_counts(&self, category: AlarmCategory) -> bool {
        self.counts(category).is_some()
    }
}

/// Upstream APIs emit `asn` both as `"34467"` and as `34467`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
