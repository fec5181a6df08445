use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub recordings_path: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub max_duration_secs: u32,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "voicepad".to_string(),
            },
            audio: AudioConfig {
                recordings_path: "recordings".to_string(),
                sample_rate: 44100,
                channels: 1,
                max_duration_secs: 30,
            },
        }
    }
}
