pub mod archive;
pub mod http;
pub mod normalize;
pub mod output;
pub mod retry;
pub mod stream;

#[cfg(test)]
mod test_server;
