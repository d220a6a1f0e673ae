use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

///
/// Thin fetch layer over the CDN's static JSON. Each dataset is requested
/// once, independently, with no retry: a failure is logged and reported as
/// "nothing there", and the game plays on with whatever templates still have
/// data. Nothing in here surfaces an error to the player.
///

/// Fetches a flat catalog (countries, cities, products, languages). Failures
/// deliver an empty list, which counts as "arrived" — the templates that join
/// against the catalog simply stand down for the session.
pub fn fetch_catalog<T>(url: &'static str, what: &'static str, target: Callback<Vec<T>>)
where
    T: DeserializeOwned + 'static,
{
    spawn_local(async move {
        target.emit(get_list(url, what).await);
    });
}

async fn get_list<T: DeserializeOwned>(url: &str, what: &'static str) -> Vec<T> {
    match Request::get(url).send().await {
        Ok(resp) if resp.ok() => match resp.json::<Vec<T>>().await {
            Ok(items) => {
                log::debug!("loaded {} {} records", items.len(), what);
                items
            }
            Err(err) => {
                log::error!("failed to decode {}: {}", what, err);
                Vec::new()
            }
        },
        Ok(resp) => {
            log::error!("{} fetch returned status {}", what, resp.status());
            Vec::new()
        }
        Err(err) => {
            log::error!("{} fetch failed: {}", what, err);
            Vec::new()
        }
    }
}

/// Fetches a per-country document (detail record, geogrid facts). `None`
/// means the document could not be had — normal for geogrid, a hard stop for
/// the detail record. The answer code rides along so responses that outlive a
/// rollover can be recognized as stale and dropped.
pub fn fetch_document<T>(
    url: String,
    what: &'static str,
    code: String,
    target: Callback<(String, Option<T>)>,
) where
    T: DeserializeOwned + 'static,
{
    spawn_local(async move {
        let document = get_document(&url, what).await;
        target.emit((code, document));
    });
}

async fn get_document<T: DeserializeOwned>(url: &str, what: &'static str) -> Option<T> {
    match Request::get(url).send().await {
        Ok(resp) if resp.ok() => match resp.json::<T>().await {
            Ok(document) => {
                log::debug!("loaded {}", what);
                Some(document)
            }
            Err(err) => {
                log::error!("failed to decode {}: {}", what, err);
                None
            }
        },
        Ok(resp) => {
            log::warn!("no {} available (status {})", what, resp.status());
            None
        }
        Err(err) => {
            log::error!("{} fetch failed: {}", what, err);
            None
        }
    }
}
