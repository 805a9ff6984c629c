//! Persistence over the site's REST endpoints.
//!
//! Every mutation is a form-encoded POST carrying the nonce header. Drag
//! commits are spawned and forgotten; dialog saves hand their outcome to the
//! completion.

use gloo::net::http::Request;
use pb_core::BreakoutConfig;
use pb_editor::persist::{
    Completion, FORM_CONTENT_TYPE, FormFields, NONCE_HEADER, NewPart, PartUpdate, PersistError,
    PersistenceApi, PositionUpdate, SaveResponse,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::UrlSearchParams;

#[derive(Debug, Clone)]
pub struct RestClient {
    position_url: String,
    create_url: String,
    update_url: String,
    nonce: String,
}

impl RestClient {
    pub fn from_config(config: &BreakoutConfig) -> Self {
        Self {
            position_url: config.rest_url.clone(),
            create_url: config.rest_create_url.clone(),
            update_url: config.rest_update_url.clone(),
            nonce: config.nonce.clone(),
        }
    }

    fn send(&self, url: &str, fields: FormFields, done: Completion) {
        if url.is_empty() {
            done(Err(PersistError::Network("endpoint not configured".into())));
            return;
        }
        let url = url.to_string();
        let nonce = self.nonce.clone();
        spawn_local(async move {
            done(post_form(&url, &nonce, fields).await);
        });
    }
}

async fn post_form(url: &str, nonce: &str, fields: FormFields) -> Result<SaveResponse, PersistError> {
    let params = UrlSearchParams::new().map_err(|_| PersistError::Network("URLSearchParams unavailable".into()))?;
    for (name, value) in &fields {
        params.append(name, value);
    }
    let response = Request::post(url)
        .header("Content-Type", FORM_CONTENT_TYPE)
        .header(NONCE_HEADER, nonce)
        .body(params)
        .map_err(|e| PersistError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| PersistError::Network(e.to_string()))?;
    let body = response
        .text()
        .await
        .map_err(|e| PersistError::Network(e.to_string()))?;
    SaveResponse::from_json(&body)?.into_result()
}

impl PersistenceApi for RestClient {
    fn update_position(&self, update: PositionUpdate) {
        let index = update.index;
        self.send(
            &self.position_url,
            update.form_fields(),
            Box::new(move |result| {
                if let Err(e) = result {
                    log::warn!("position update for part {index} failed: {e}");
                }
            }),
        );
    }

    fn create_part(&self, part: NewPart, done: Completion) {
        self.send(&self.create_url, part.form_fields(), done);
    }

    fn update_part(&self, update: PartUpdate, done: Completion) {
        self.send(&self.update_url, update.form_fields(), done);
    }
}
