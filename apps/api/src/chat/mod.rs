// Career chat: per-session history carried by the caller.

pub mod history;

pub use history::ChatHistory;
