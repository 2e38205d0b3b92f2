mod client;
mod collector;
mod types;

pub use client::JenkinsClient;
pub use collector::collect_all;
