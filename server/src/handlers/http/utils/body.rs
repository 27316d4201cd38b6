use anyhow::{Context, Result};
use bytes::Bytes;
use hyper::Request;
use hyper::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Decode a POST body as JSON or `application/x-www-form-urlencoded`.
///
/// An empty body decodes like `{}`, so types whose fields all default still parse.
pub fn parse_body<T: DeserializeOwned>(req: &Request<Bytes>) -> Result<T> {
    let body = req.body();

    let is_form = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    let value = if is_form {
        let fields: Map<String, Value> = form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect();
        Value::Object(fields)
    } else if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(body).context("Request body is not valid JSON")?
    };

    serde_json::from_value(value).context("Request body is missing required fields")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tollgate_shared::types::{RegistrationData, SexFilter};

    fn request(content_type: Option<&str>, body: &'static str) -> Request<Bytes> {
        let mut builder = Request::builder().method("POST").uri("/register");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Bytes::from_static(body.as_bytes())).unwrap()
    }

    #[test]
    fn json_body_with_numeric_sex() {
        let req = request(Some("application/json"), r#"{"phone":"138","sex":1}"#);
        let data: RegistrationData = parse_body(&req).unwrap();
        assert_eq!(data.phone, "138");
        assert_eq!(data.sex, Some(1));
    }

    #[test]
    fn form_body_with_textual_sex() {
        let req = request(
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
            "phone=139&sex=0",
        );
        let data: RegistrationData = parse_body(&req).unwrap();
        assert_eq!(data.phone, "139");
        assert_eq!(data.sex, Some(0));
    }

    #[test]
    fn empty_body_uses_defaults() {
        let filter: SexFilter = parse_body(&request(None, "")).unwrap();
        assert_eq!(filter.sex, None);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let req = request(Some("application/json"), r#"{"sex":1}"#);
        assert!(parse_body::<RegistrationData>(&req).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let req = request(Some("application/json"), "{not json");
        assert!(parse_body::<RegistrationData>(&req).is_err());
    }
}
