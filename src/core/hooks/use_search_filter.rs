use leptos::prelude::*;

use crate::core::sync::filter_by_query;

pub struct SearchFilterHook<T: Send + Sync + 'static> {
    pub query: RwSignal<String>,
    pub filtered: Memo<Vec<T>>,
}

/// Filters `items` with `predicate` against a live query. The empty query
/// shows everything.
pub fn use_search_filter<T, P>(items: Signal<Vec<T>>, predicate: P) -> SearchFilterHook<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    P: Fn(&T, &str) -> bool + Send + Sync + 'static,
{
    let query = RwSignal::new(String::new());
    let filtered = Memo::new(move |_| {
        items.with(|items| query.with(|q| filter_by_query(items, q, &predicate).into_owned()))
    });
    SearchFilterHook { query, filtered }
}
