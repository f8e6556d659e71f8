// Aggregated series shapes handed to the chart mapper
use serde::Serialize;

/// One category's values over a week axis; `weeks[i]` labels `values[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesByCategory<V> {
    pub category: String,
    pub weeks: Vec<String>,
    pub values: Vec<V>,
}

impl<V> SeriesByCategory<V> {
    pub fn new(category: String, weeks: Vec<String>, values: Vec<V>) -> Self {
        debug_assert_eq!(weeks.len(), values.len());
        Self {
            category,
            weeks,
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: u64,
}

impl PieSlice {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
