pub mod use_fetch;
pub mod use_polling;
pub mod use_search_filter;

pub use use_fetch::{use_fetch, use_fetch_with, FetchHook};
pub use use_polling::{use_polling, use_polling_with};
pub use use_search_filter::{use_search_filter, SearchFilterHook};
