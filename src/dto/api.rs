//! Response envelopes returned by the REST backend.

use serde::Deserialize;

use crate::session::SessionUser;

/// Body of `GET /{resource}/all`.
///
/// Endpoints disagree on the name of the total-count field, so all known
/// spellings are accepted.
#[derive(Debug, Deserialize)]
pub struct ListEnvelope<E> {
    pub data: Option<Vec<E>>,
    #[serde(default)]
    pub total_results: Option<usize>,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl<E> ListEnvelope<E> {
    /// First total-count field present, falling back to the number of
    /// returned items.
    pub fn total_count(&self) -> usize {
        self.total_results
            .or(self.total)
            .or(self.count)
            .unwrap_or_else(|| self.data.as_ref().map_or(0, Vec::len))
    }
}

/// Body of the create/update/delete endpoints.
#[derive(Debug, Deserialize)]
pub struct WriteEnvelope<E> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<E>,
}

impl<E> WriteEnvelope<E> {
    /// A missing `success` flag on a 2xx response counts as success.
    pub fn succeeded(&self) -> bool {
        self.success.unwrap_or(true)
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Record;
    use serde_json::json;

    #[test]
    fn total_count_prefers_total_results() {
        let envelope: ListEnvelope<Record> = serde_json::from_value(json!({
            "data": [{"id": 1}],
            "total_results": 40,
            "total": 3,
            "count": 2
        }))
        .unwrap();
        assert_eq!(envelope.total_count(), 40);
    }

    #[test]
    fn total_count_accepts_alternative_names() {
        let envelope: ListEnvelope<Record> =
            serde_json::from_value(json!({"data": [], "count": 7})).unwrap();
        assert_eq!(envelope.total_count(), 7);

        let envelope: ListEnvelope<Record> =
            serde_json::from_value(json!({"data": [{"id": "a"}, {"id": "b"}]})).unwrap();
        assert_eq!(envelope.total_count(), 2);
    }

    #[test]
    fn missing_data_is_reported_as_none() {
        let envelope: ListEnvelope<Record> =
            serde_json::from_value(json!({"total": 3})).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn write_envelope_defaults() {
        let envelope: WriteEnvelope<Record> = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.succeeded());
        assert!(envelope.data.is_none());

        let envelope: WriteEnvelope<Record> =
            serde_json::from_value(json!({"success": false, "message": "SKU taken"})).unwrap();
        assert!(!envelope.succeeded());
        assert_eq!(envelope.message.as_deref(), Some("SKU taken"));
    }

    #[test]
    fn login_response_accepts_access_token() {
        let response: LoginResponse = serde_json::from_value(json!({
            "access_token": "jwt",
            "user": {"name": "Admin", "role": "admin"}
        }))
        .unwrap();
        assert_eq!(response.token.as_deref(), Some("jwt"));
        assert_eq!(response.user.unwrap().role.as_deref(), Some("admin"));
    }
}
