pub mod authorized_keys;
pub mod http_fetcher;
