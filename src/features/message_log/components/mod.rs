pub mod live_poller;
pub mod log_toolbar;
pub mod message_card;
pub mod message_list;

pub use live_poller::LivePoller;
pub use log_toolbar::LogToolbar;
pub use message_card::MessageCard;
pub use message_list::MessageList;
