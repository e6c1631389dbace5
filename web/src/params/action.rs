use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    /// Only return actions created after this RFC 3339 timestamp.
    #[param(value_type = Option<String>, format = DateTime, example = "2024-03-01T00:00:00Z")]
    pub(crate) after: Option<DateTime<FixedOffset>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_parses_an_rfc3339_timestamp() {
        let params: IndexParams =
            parse_query("after=2024-03-01T12%3A30%3A00%2B02%3A00");

        let after = params.after.unwrap();
        assert_eq!(after.to_rfc3339(), "2024-03-01T12:30:00+02:00");
    }

    #[test]
    fn after_is_optional() {
        let params: IndexParams = parse_query("");

        assert!(params.after.is_none());
    }

    fn parse_query(query: &str) -> IndexParams {
        let uri: axum::http::Uri = format!("/actions?{query}").parse().unwrap();
        axum::extract::Query::<IndexParams>::try_from_uri(&uri)
            .unwrap()
            .0
    }
}
