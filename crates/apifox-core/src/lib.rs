pub mod config;
pub mod logging;

// Key resolution -> retrying fetch -> result envelope
pub mod apifox;
pub mod cancel;
pub mod fetch;
pub mod key;
pub mod response;
pub mod retry;
