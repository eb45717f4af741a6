use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::NodeRef;

/// Versioned local-storage slot for a persisted value.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault {
    fn local_or_default() -> Self;
}

impl<T> LocalOrDefault for Option<T>
where
    T: StorageKey + DeserializeOwned,
{
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).ok()
    }
}

pub(crate) trait LocalSave {
    fn local_save(&self);
}

impl<T> LocalSave for Option<T>
where
    T: StorageKey + Serialize,
{
    fn local_save(&self) {
        match self {
            Some(value) => {
                if let Err(err) = LocalStorage::set(T::KEY, value) {
                    log::error!("could not save {}: {:?}", T::KEY, err);
                }
            }
            None => LocalStorage::delete(T::KEY),
        }
    }
}

pub(crate) fn input_value(node: &NodeRef) -> String {
    node.cast::<HtmlInputElement>()
        .map(|input| input.value())
        .unwrap_or_default()
}

pub(crate) fn parse_input<T: std::str::FromStr>(node: &NodeRef) -> Option<T> {
    node.cast::<HtmlInputElement>()?.value().trim().parse().ok()
}

pub(crate) fn select_value(node: &NodeRef) -> String {
    node.cast::<HtmlSelectElement>()
        .map(|select| select.value())
        .unwrap_or_default()
}
