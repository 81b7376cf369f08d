use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::env;

/// A single entry of the gitignore template catalog.
#[derive(Debug, Deserialize)]
pub struct Template {
    pub name: String,
    pub source: String,
}

pub fn gh_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static("gitify-templates"));
    if let Ok(tok) = env::var("GITHUB_TOKEN") {
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", tok))?,
        );
    }
    let client = Client::builder().default_headers(headers).build()?;
    Ok(client)
}

/// Names of every template the catalog offers.
pub fn fetch_catalog(client: &Client, api: &str) -> Result<Vec<String>> {
    let url = format!("{}/gitignore/templates", api.trim_end_matches('/'));
    let names: Vec<String> = client.get(url).send()?.error_for_status()?.json()?;
    Ok(names)
}

/// Fetch one template by its exact catalog name.
pub fn fetch_template(client: &Client, api: &str, name: &str) -> Result<Template> {
    let url = format!("{}/gitignore/templates/{}", api.trim_end_matches('/'), name);
    let tpl: Template = client.get(url).send()?.error_for_status()?.json()?;
    Ok(tpl)
}

/// Resolve `tag` against the catalog (ASCII case-insensitive) and fetch it.
///
/// Returns `Ok(None)` when the catalog has no such entry.
pub fn find_template(client: &Client, api: &str, tag: &str) -> Result<Option<Template>> {
    let catalog = fetch_catalog(client, api)?;
    match catalog.iter().find(|n| n.eq_ignore_ascii_case(tag)) {
        Some(name) => Ok(Some(fetch_template(client, api, name)?)),
        None => Ok(None),
    }
}
