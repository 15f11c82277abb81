use serde::Serialize;

/// Uniform JSON wrapper for `/comics` responses. Absent fields are omitted.
#[derive(Serialize, Debug)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<ListFilters>,
}

/// List query parameters echoed back as received.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, message: None, count: None, total: None, filters: None }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn with_counts(mut self, count: u64, total: u64, filters: ListFilters) -> Self {
        self.count = Some(count);
        self.total = Some(total);
        self.filters = Some(filters);
        self
    }
}

impl Envelope<()> {
    pub fn failure(error: String) -> Self {
        Self { success: false, data: None, error: Some(error), message: None, count: None, total: None, filters: None }
    }
}
