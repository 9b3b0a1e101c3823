use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_serving_addr")]
    pub serving_addr: String,

    /// Directory with the web client. Served as a fallback for all non-API routes.
    #[serde(default = "default_static_serving_dir")]
    pub static_serving_dir: PathBuf,

    /// How long the ball "thinks" before revealing an answer.
    #[serde(default = "default_shake_delay_ms")]
    pub shake_delay_ms: u64,
}

fn default_serving_addr() -> String {
    "0.0.0.0:3000".into()
}

fn default_static_serving_dir() -> PathBuf {
    "ui/dist".into()
}

fn default_shake_delay_ms() -> u64 {
    1500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serving_addr: default_serving_addr(),
            static_serving_dir: default_static_serving_dir(),
            shake_delay_ms: default_shake_delay_ms(),
        }
    }
}

impl Config {
    pub fn shake_delay(&self) -> Duration {
        Duration::from_millis(self.shake_delay_ms)
    }
}
