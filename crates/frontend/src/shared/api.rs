//! Обёртки над fetch для общения с бэкендом.
//!
//! Все запросы идут на тот же origin; мутации несут CSRF-токен из
//! cookie. Ошибка — человекочитаемая строка: либо `message` из тела
//! не-2xx ответа, либо описание сетевого сбоя.

use contracts::mutation::ErrorBody;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsCast;

/// Базовый адрес API: origin текущей страницы.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    window.location().origin().unwrap_or_default()
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Значение cookie по имени (нужен `csrftoken`).
pub fn cookie_value(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let html_doc = document.dyn_into::<web_sys::HtmlDocument>().ok()?;
    let cookies = html_doc.cookie().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

async fn decode_or_error<T: DeserializeOwned>(resp: Response) -> Result<T, String> {
    if !resp.ok() {
        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        return Err(message.unwrap_or_else(|| format!("Ошибка сервера: HTTP {}", resp.status())));
    }
    resp.json::<T>().await.map_err(|e| format!("{e}"))
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let resp = Request::get(&api_url(path))
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| format!("{e}"))?;
    decode_or_error(resp).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<T, String> {
    let mut builder = Request::post(&api_url(path)).header("Accept", "application/json");
    if let Some(token) = cookie_value("csrftoken") {
        builder = builder.header("X-CSRFToken", &token);
    }
    let resp = builder
        .json(body)
        .map_err(|e| format!("{e}"))?
        .send()
        .await
        .map_err(|e| format!("{e}"))?;
    decode_or_error(resp).await
}

/// POST с телом `application/x-www-form-urlencoded` (формы записей).
pub async fn post_form<T: DeserializeOwned>(
    path: &str,
    pairs: &[(String, String)],
) -> Result<T, String> {
    let body = encode_pairs(pairs);
    let mut builder = Request::post(&api_url(path))
        .header("Accept", "application/json")
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(token) = cookie_value("csrftoken") {
        builder = builder.header("X-CSRFToken", &token);
    }
    let resp = builder
        .body(body)
        .map_err(|e| format!("{e}"))?
        .send()
        .await
        .map_err(|e| format!("{e}"))?;
    decode_or_error(resp).await
}

pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_urlencoded() {
        let body = encode_pairs(&[
            ("name".into(), "ООО Ромашка".into()),
            ("amount".into(), "1 500 р.".into()),
        ]);
        assert_eq!(
            body,
            "name=%D0%9E%D0%9E%D0%9E%20%D0%A0%D0%BE%D0%BC%D0%B0%D1%88%D0%BA%D0%B0&amount=1%20500%20%D1%80."
        );
    }
}
