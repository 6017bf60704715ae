use serde::{Deserialize, Serialize};

/// One row exactly as the paginated API sends it.
pub type Row = Vec<serde_json::Value>;

/// A single page of the paginated table API.
///
/// `columns` is only populated on page 1.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawPage {
    pub page_count: i64,
    #[serde(default)]
    pub values: Vec<Row>,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
}

impl RawPage {
    /// Column names in server order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}
