mod config;
mod env;
mod utils;
