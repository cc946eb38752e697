use serde::{Deserialize, Serialize};

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://{area}.craigslist.org/search/cta?format=rss&min_price={min_price}&max_price={max_price}";

/// One classified-ad area with its own feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Area {
    /// Identifier substituted for `{area}` in the URL template.
    pub id: String,
    pub name: String,
    pub region: String,
}

impl Area {
    fn new(id: &str, name: &str, region: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            region: region.to_owned(),
        }
    }
}

/// Price bounds pushed down into the source query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: u64,
    pub max: u64,
}

/// A concrete URL to fetch for one area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEndpoint {
    pub area: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceCatalog {
    pub url_template: String,
    pub areas: Vec<Area>,
}

impl Default for SourceCatalog {
    fn default() -> Self {
        let oregon = [
            ("portland", "Portland"),
            ("eugene", "Eugene"),
            ("salem", "Salem"),
            ("corvallis", "Corvallis"),
            ("bend", "Bend"),
            ("medford", "Medford"),
            ("roseburg", "Roseburg"),
            ("klamath", "Klamath Falls"),
            ("eastoregon", "Eastern OR"),
            ("oregoncoast", "Oregon Coast"),
        ];
        let washington = [
            ("seattle", "Seattle"),
            ("spokane", "Spokane"),
            ("yakima", "Yakima"),
            ("kennewick", "Tri-Cities"),
            ("wenatchee", "Wenatchee"),
            ("bellingham", "Bellingham"),
            ("olympic", "Olympic Peninsula"),
            ("pullman", "Pullman"),
            ("skagit", "Skagit"),
        ];

        let areas = oregon
            .iter()
            .map(|(id, name)| Area::new(id, name, "oregon"))
            .chain(
                washington
                    .iter()
                    .map(|(id, name)| Area::new(id, name, "washington")),
            )
            .collect();

        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_owned(),
            areas,
        }
    }
}

impl SourceCatalog {
    pub fn with_template(url_template: impl Into<String>, areas: Vec<Area>) -> Self {
        Self {
            url_template: url_template.into(),
            areas,
        }
    }

    /// One endpoint per area, in catalog order.
    pub fn endpoints(&self, bounds: PriceBounds) -> Vec<SourceEndpoint> {
        self.areas
            .iter()
            .map(|area| SourceEndpoint {
                area: area.id.clone(),
                url: self
                    .url_template
                    .replace("{area}", &area.id)
                    .replace("{min_price}", &bounds.min.to_string())
                    .replace("{max_price}", &bounds.max.to_string()),
            })
            .collect()
    }

    /// Area display names grouped by region, regions in first-seen order.
    pub fn regions(&self) -> Vec<(String, Vec<String>)> {
        let mut regions: Vec<(String, Vec<String>)> = Vec::new();
        for area in &self.areas {
            match regions.iter_mut().find(|(region, _)| *region == area.region) {
                Some((_, names)) => names.push(area.name.clone()),
                None => regions.push((area.region.clone(), vec![area.name.clone()])),
            }
        }
        regions
    }
}
