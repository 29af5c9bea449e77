use std::path::PathBuf;

use clap::Parser;

use crate::chat::groq::{DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Parser)]
#[command(name = "clinic-queue-server", about = "Appointment queue, reports and chat proxy")]
pub struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Directory holding queue.json, reports.json and attendedpatients.json
    #[arg(long, env = "DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Chat completion model
    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the OpenAI-compatible completion API
    #[arg(long, env = "GROQ_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub api_base: String,

    /// API key for the completion service. Not validated at startup.
    #[arg(long, env = "GROQ_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,
}

impl Cli {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
