use serde::Deserialize;

// filters
//  ├── maxPrice      (required)
//  ├── minBedrooms   (required)
//  ├── keywords      (optional, joined with ",")
//  └── radius        (optional, miles)

/// Search constraints applied to every area in a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub max_price: u32,
    pub min_bedrooms: u32,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub radius: f64,
}

impl SearchFilters {
    pub fn new(max_price: u32, min_bedrooms: u32) -> Self {
        Self {
            max_price,
            min_bedrooms,
            keywords: Vec::new(),
            radius: 0.0,
        }
    }

    /// Query pairs for one results page, in the order the site expects them.
    /// Optional filters are left out entirely when unset.
    pub fn query_pairs(&self, area: &str, index: usize) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("locationIdentifier", area.replace(' ', "")),
            ("radius", self.radius.to_string()),
            ("index", index.to_string()),
            ("minBedrooms", self.min_bedrooms.to_string()),
            ("maxPrice", self.max_price.to_string()),
        ];

        let keywords: Vec<&str> = self
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        if !keywords.is_empty() {
            pairs.push(("keywords", keywords.join(",")));
        }

        pairs
    }
}
