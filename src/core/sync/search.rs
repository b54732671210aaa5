use std::borrow::Cow;

/// Keeps the items matching `predicate(item, query)`, in their original order.
///
/// An empty query returns `items` itself, borrowed, without calling the
/// predicate, so predicates never need to handle the empty case.
pub fn filter_by_query<'a, T, P>(items: &'a [T], query: &str, predicate: P) -> Cow<'a, [T]>
where
    T: Clone,
    P: Fn(&T, &str) -> bool,
{
    if query.is_empty() {
        return Cow::Borrowed(items);
    }
    Cow::Owned(
        items
            .iter()
            .filter(|item| predicate(item, query))
            .cloned()
            .collect(),
    )
}
