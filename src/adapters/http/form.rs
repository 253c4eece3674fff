//! Lenient form extraction for `POST /create`.
//!
//! Fields are read from a urlencoded body, a multipart body, or the
//! query string, in that order of precedence; the first occurrence of a
//! field wins. Anything unreadable (wrong content type, malformed body,
//! missing field) leaves the field empty instead of rejecting the
//! request, so validation stays with the roster use case.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::Form;
use axum::extract::{FromRequest, Multipart, Query, Request};
use axum::http::header;
use tracing::debug;

/// Creation form fields. Missing fields read as empty strings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CreateCharacterForm {
    pub name: String,
    pub class: String,
    pub level: String,
}

impl CreateCharacterForm {
    /// Build from raw `(field, value)` pairs, first occurrence first.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let field = |wanted: &str| {
            pairs
                .iter()
                .find(|(name, _)| name == wanted)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        };
        Self {
            name: field("name"),
            class: field("class"),
            level: field("level"),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for CreateCharacterForm
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mut pairs = if content_type.starts_with("multipart/form-data") {
            multipart_pairs(req, state).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            match Form::<Vec<(String, String)>>::from_request(req, state).await {
                Ok(Form(pairs)) => pairs,
                Err(e) => {
                    debug!(error = %e, "Unreadable form body, treating as empty");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        pairs.extend(query);
        Ok(Self::from_pairs(&pairs))
    }
}

/// Collect text fields from a multipart body, stopping at the first
/// malformed part.
async fn multipart_pairs<S>(req: Request, state: &S) -> Vec<(String, String)>
where
    S: Send + Sync,
{
    let mut pairs = Vec::new();
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(e) => {
            debug!(error = %e, "Unreadable multipart body, treating as empty");
            return pairs;
        }
    };

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let Some(name) = field.name().map(str::to_owned) else {
                    continue;
                };
                match field.text().await {
                    Ok(value) => pairs.push((name, value)),
                    Err(e) => {
                        debug!(field = %name, error = %e, "Unreadable multipart field");
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "Malformed multipart body");
                break;
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let form = CreateCharacterForm::from_pairs(&pairs(&[
            ("level", "3"),
            ("name", "Aria"),
            ("level", "9"),
        ]));
        assert_eq!(form.level, "3");
        assert_eq!(form.name, "Aria");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        assert_eq!(
            CreateCharacterForm::from_pairs(&[]),
            CreateCharacterForm::default()
        );
    }

    #[tokio::test]
    async fn test_body_takes_precedence_over_query() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/create?level=1&class=Bard")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(axum::body::Body::from("level=2"))
            .unwrap();
        let form = CreateCharacterForm::from_request(req, &()).await.unwrap();
        assert_eq!(form.level, "2");
        assert_eq!(form.class, "Bard");
    }

    #[tokio::test]
    async fn test_unknown_content_type_falls_back_to_query() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/create?name=Aria&level=4")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(axum::body::Body::from("level=99"))
            .unwrap();
        let form = CreateCharacterForm::from_request(req, &()).await.unwrap();
        assert_eq!(form.name, "Aria");
        assert_eq!(form.level, "4");
    }
}
