extern crate log;

use dotenvy::dotenv;
use lazy_static::lazy_static;
use std::env;

pub mod analysis;
pub mod client;
pub mod gemini;
pub mod input;
pub mod mock;
pub mod notice;
pub mod preprocess;
pub mod sections;
pub mod server;
pub mod storage;
pub mod submission;
pub mod summarizer;
pub mod view;

lazy_static! {
    pub static ref GOOGLE_API_KEY: Option<String> = {
        dotenv().ok();
        env::var("GOOGLE_API_KEY").ok().filter(|x| !x.trim().is_empty())
    };
    pub static ref GEMINI_MODEL: String = {
        dotenv().ok();
        env::var("GEMINI_MODEL").unwrap_or("gemini-1.5-pro".to_string())
    };
    pub static ref GEMINI_BASE_URL: String = {
        dotenv().ok();
        env::var("GEMINI_BASE_URL")
            .unwrap_or("https://generativelanguage.googleapis.com".to_string())
    };
    pub static ref SERVER_ADDRESS: String = {
        dotenv().ok();
        env::var("SERVER_ADDRESS").unwrap_or("0.0.0.0".to_string())
    };
    pub static ref SERVER_PORT: String = {
        dotenv().ok();
        env::var("SERVER_PORT").unwrap_or("5000".to_string())
    };
    pub static ref SUMMARIZER_URL: String = {
        dotenv().ok();
        env::var("SUMMARIZER_URL").unwrap_or("http://localhost:5000".to_string())
    };
    pub static ref STORAGE_PATH: String = {
        dotenv().ok();
        env::var("STORAGE_PATH").unwrap_or(".threadsum.json".to_string())
    };
}

/// Logging follows the PROFILE switch: `debug` reads `log4rs.yml`, anything else
/// falls back to env_logger.
pub fn init_logging() {
    if let Ok(profile) = env::var("PROFILE") {
        if profile == "debug" {
            match log4rs::init_file("log4rs.yml", Default::default()) {
                Ok(()) => return,
                Err(e) => eprintln!("failed to load log4rs.yml ({e}), using env_logger"),
            }
        }
    }
    env_logger::init();
}
