// crates/systems/flame_wii/src/config.rs
use flame_display::WindowScale;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing value for {0}")]
    MissingValue(&'static str),
    #[error("Invalid value for {flag}: {value}")]
    InvalidValue { flag: &'static str, value: String },
    #[error("Unknown argument: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmulatorConfig {
    pub target_fps: f64,
    pub scale: WindowScale,
    pub mute: bool,
    /// Frames between FPS log lines (~5 s at 60 FPS)
    pub fps_log_interval: u64,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            scale: WindowScale::X1,
            mute: false,
            fps_log_interval: 300,
        }
    }
}

pub const USAGE: &str = "Usage: flame_wii [--fps <n>] [--scale <1|2|4|8|fit>] [--mute]";

impl EmulatorConfig {
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--fps" => {
                    let value = args.next().ok_or(ConfigError::MissingValue("--fps"))?;
                    config.target_fps = value
                        .parse::<f64>()
                        .ok()
                        .filter(|fps| *fps > 0.0)
                        .ok_or(ConfigError::InvalidValue { flag: "--fps", value })?;
                }
                "--scale" => {
                    let value = args.next().ok_or(ConfigError::MissingValue("--scale"))?;
                    config.scale = WindowScale::parse(&value)
                        .ok_or(ConfigError::InvalidValue { flag: "--scale", value })?;
                }
                "--mute" => config.mute = true,
                _ => return Err(ConfigError::Unknown(arg)),
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = EmulatorConfig::from_args(args(&[])).unwrap();
        assert_eq!(config, EmulatorConfig::default());
    }

    #[test]
    fn test_all_flags() {
        let config = EmulatorConfig::from_args(args(&["--fps", "30", "--scale", "2", "--mute"])).unwrap();
        assert_eq!(config.target_fps, 30.0);
        assert_eq!(config.scale, WindowScale::X2);
        assert!(config.mute);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            EmulatorConfig::from_args(args(&["--fps"])),
            Err(ConfigError::MissingValue("--fps"))
        );
        assert_eq!(
            EmulatorConfig::from_args(args(&["--fps", "-1"])),
            Err(ConfigError::InvalidValue { flag: "--fps", value: "-1".to_string() })
        );
        assert_eq!(
            EmulatorConfig::from_args(args(&["--turbo"])),
            Err(ConfigError::Unknown("--turbo".to_string()))
        );
    }
}
