use axum::http::header;
use axum::response::{Html, IntoResponse, Json, Response};
use folio_core::Entry;
use folio_engine::EngineError;
use minijinja::Environment;
use serde::Serialize;

use crate::error::ServerError;

const HTML_TEMPLATE: &str = "listing.html";
const XML_TEMPLATE: &str = "listing.xml";

/// Response representation for a folder listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Html,
    Xml,
}

impl Format {
    /// Pick a format from the `format` query parameter, falling back to the
    /// `Accept` header and then to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BadRequest`] for an unrecognised `format`
    /// value.
    pub fn negotiate(query: Option<&str>, accept: Option<&str>) -> Result<Self, EngineError> {
        if let Some(requested) = query {
            return match requested.to_ascii_lowercase().as_str() {
                "json" => Ok(Self::Json),
                "html" => Ok(Self::Html),
                "xml" => Ok(Self::Xml),
                other => Err(EngineError::BadRequest(format!(
                    "unsupported format {other:?} (expected json, html or xml)"
                ))),
            };
        }

        let accept = accept.unwrap_or_default().to_ascii_lowercase();
        if accept.contains("text/html") {
            Ok(Self::Html)
        } else if accept.contains("application/xml") || accept.contains("text/xml") {
            Ok(Self::Xml)
        } else {
            Ok(Self::Json)
        }
    }
}

/// Template context for one listing.
#[derive(Debug, Serialize)]
pub struct ListingView<'a> {
    pub grant_id: &'a str,
    pub path: &'a str,
    pub entries: &'a [Entry],
}

/// Renders listings as HTML or XML from embedded `MiniJinja` templates.
///
/// Templates are auto-escaped based on their extension.
#[derive(Debug)]
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Compile the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Render`] if a template fails to parse.
    pub fn new() -> Result<Self, ServerError> {
        let mut env = Environment::new();
        env.add_template(HTML_TEMPLATE, include_str!("../../templates/listing.html"))
            .map_err(|e| ServerError::Render(e.to_string()))?;
        env.add_template(XML_TEMPLATE, include_str!("../../templates/listing.xml"))
            .map_err(|e| ServerError::Render(e.to_string()))?;
        Ok(Self { env })
    }

    /// Render `view` in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Render`] if template evaluation fails.
    pub fn respond(&self, format: Format, view: &ListingView<'_>) -> Result<Response, ServerError> {
        match format {
            Format::Json => Ok(Json(view.entries).into_response()),
            Format::Html => Ok(Html(self.render(HTML_TEMPLATE, view)?).into_response()),
            Format::Xml => Ok((
                [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
                self.render(XML_TEMPLATE, view)?,
            )
                .into_response()),
        }
    }

    fn render(&self, name: &str, view: &ListingView<'_>) -> Result<String, ServerError> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(view))
            .map_err(|e| ServerError::Render(format!("{name}: {e}")))
    }
}
