//! Collect row fields from the query string and an optional form or JSON body.

use crate::error::AppError;
use crate::service::RawFields;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Query, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::Value;

/// Raw field values for a create or update. Body fields override query fields
/// with the same name.
#[derive(Clone, Debug, Default)]
pub struct RowData(pub RawFields);

#[async_trait]
impl<S> FromRequest<S> for RowData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut fields = RawFields::new();
        if req.uri().query().is_some() {
            let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            fields.extend(pairs.into_iter().map(|(k, v)| (k, Some(v))));
        }

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            fields.extend(pairs.into_iter().map(|(k, v)| (k, Some(v))));
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            fields.extend(json_fields(body)?);
        }
        Ok(RowData(fields))
    }
}

fn json_fields(body: Value) -> Result<RawFields, AppError> {
    let Value::Object(map) = body else {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    };
    map.into_iter()
        .map(|(k, v)| {
            let raw = match v {
                Value::Null => None,
                Value::String(s) => Some(s),
                Value::Bool(b) => Some(b.to_string()),
                Value::Number(n) => Some(n.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(AppError::BadRequest(format!("field '{}' must be a scalar", k)));
                }
            };
            Ok((k, raw))
        })
        .collect()
}
