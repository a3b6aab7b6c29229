//! Scenario configuration
//!
//! Read from a `key=value` file (`greenfoot.cfg` by default). Every key has a
//! default, so a missing file simply yields [`Config::default`].

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name
pub const CONFIG_FILE: &str = "greenfoot.cfg";

/// How the window is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    /// Fixed size window
    Windowed,
    /// Window the user can resize
    #[default]
    Resizable,
    /// Exclusive fullscreen
    Fullscreen,
    /// Borderless fullscreen on the current monitor
    Borderless,
}

impl WindowMode {
    /// Parse the text form, case insensitive
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "windowed" => Some(Self::Windowed),
            "resizable" => Some(Self::Resizable),
            "fullscreen" => Some(Self::Fullscreen),
            "borderless" => Some(Self::Borderless),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windowed => "windowed",
            Self::Resizable => "resizable",
            Self::Fullscreen => "fullscreen",
            Self::Borderless => "borderless",
        }
    }
}

impl std::fmt::Display for WindowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scenario configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Window title
    pub title: String,
    pub window_mode: WindowMode,
    /// Window width, `None` to fit the world
    pub window_width: Option<i32>,
    /// Window height, `None` to fit the world
    pub window_height: Option<i32>,
    /// Window x position, `None` to centre
    pub window_x: Option<i32>,
    /// Window y position, `None` to centre
    pub window_y: Option<i32>,
    /// Frames per second cap, `None` for unlimited
    pub fps_limit: Option<i32>,
    /// Milliseconds between two act cycles
    pub world_speed: i32,
    pub image_folder: String,
    pub sound_folder: String,
    /// Log frame statistics once per second
    pub show_fps: bool,
    /// Write the class diagram when the application starts
    pub generate_diagram: bool,
    /// Directory scanned for sources when the diagram is written on start
    pub diagram_source_dir: String,
    pub diagram_output_dir: String,
    /// Diagram file name without the `.wsd` extension
    pub diagram_file: String,
    /// Directory name suffixes skipped by the diagram generator
    pub diagram_ignore: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::from("Greenfoot"),
            window_mode: WindowMode::default(),
            window_width: None,
            window_height: None,
            window_x: None,
            window_y: None,
            fps_limit: Some(60),
            world_speed: 0,
            image_folder: String::from("images"),
            sound_folder: String::from("sounds"),
            show_fps: false,
            generate_diagram: false,
            diagram_source_dir: String::from("."),
            diagram_output_dir: String::from("_structure"),
            diagram_file: String::from("diagram"),
            diagram_ignore: Vec::new(),
        }
    }
}

impl Config {
    /// Parse configuration text
    ///
    /// # Errors
    ///
    /// Returns an error for a line without `=`, an empty key or a value
    /// that does not fit its key
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let mut seen: Vec<String> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::Malformed { line });
            };
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() {
                return Err(ConfigError::Malformed { line });
            }

            if seen.iter().any(|k| k == key) {
                log::warn!("config line {line}: duplicate key '{key}', the last value wins");
            } else {
                seen.push(key.to_string());
            }

            let entry = Entry { line, key, value };
            match key {
                "title" => config.title = entry.string(),
                "windowMode" => {
                    config.window_mode = WindowMode::parse(entry.value)
                        .ok_or_else(|| entry.invalid("windowed, resizable, fullscreen or borderless"))?;
                }
                "windowWidth" => config.window_width = entry.optional_int()?,
                "windowHeight" => config.window_height = entry.optional_int()?,
                "windowX" => config.window_x = entry.optional_int()?,
                "windowY" => config.window_y = entry.optional_int()?,
                "fpsLimit" => {
                    let limit = entry.optional_int()?;
                    if limit.is_some_and(|l| l <= 0) {
                        return Err(entry.invalid("a positive integer or none"));
                    }
                    config.fps_limit = limit;
                }
                "worldSpeed" => {
                    let speed = entry.int()?;
                    if speed < 0 {
                        return Err(entry.invalid("a non-negative integer"));
                    }
                    config.world_speed = speed;
                }
                "imageFolder" => config.image_folder = entry.string(),
                "soundFolder" => config.sound_folder = entry.string(),
                "showFps" => config.show_fps = entry.boolean()?,
                "generateDiagram" => config.generate_diagram = entry.boolean()?,
                "diagramSourceDir" => config.diagram_source_dir = entry.string(),
                "diagramOutputDir" => config.diagram_output_dir = entry.string(),
                "diagramFile" => config.diagram_file = entry.string(),
                "diagramIgnore" => {
                    config.diagram_ignore = entry
                        .string()
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect();
                }
                _ => log::warn!("config line {line}: unknown key '{key}' ignored"),
            }
        }

        Ok(config)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::parse(&text)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load a configuration file, using the defaults when it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No {} found, using default configuration", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write every key in file form; the output parses back to `self`
    #[must_use]
    pub fn to_cfg_string(&self) -> String {
        fn opt(value: Option<i32>) -> String {
            value.map_or_else(|| String::from("none"), |v| v.to_string())
        }

        let mut out = String::new();
        let _ = writeln!(out, "title=\"{}\"", self.title);
        let _ = writeln!(out, "windowMode={}", self.window_mode);
        let _ = writeln!(out, "windowWidth={}", opt(self.window_width));
        let _ = writeln!(out, "windowHeight={}", opt(self.window_height));
        let _ = writeln!(out, "windowX={}", opt(self.window_x));
        let _ = writeln!(out, "windowY={}", opt(self.window_y));
        let _ = writeln!(out, "fpsLimit={}", opt(self.fps_limit));
        let _ = writeln!(out, "worldSpeed={}", self.world_speed);
        let _ = writeln!(out, "imageFolder=\"{}\"", self.image_folder);
        let _ = writeln!(out, "soundFolder=\"{}\"", self.sound_folder);
        let _ = writeln!(out, "showFps={}", self.show_fps);
        let _ = writeln!(out, "generateDiagram={}", self.generate_diagram);
        let _ = writeln!(out, "diagramSourceDir=\"{}\"", self.diagram_source_dir);
        let _ = writeln!(out, "diagramOutputDir=\"{}\"", self.diagram_output_dir);
        let _ = writeln!(out, "diagramFile=\"{}\"", self.diagram_file);
        let _ = writeln!(out, "diagramIgnore=\"{}\"", self.diagram_ignore.join(","));
        out
    }

    /// Time between two act cycles
    #[must_use]
    pub fn world_speed(&self) -> Duration {
        Duration::from_millis(self.world_speed.max(0) as u64)
    }

    /// Minimum time between two frames, `None` when unlimited
    #[must_use]
    pub fn frame_interval(&self) -> Option<Duration> {
        self.fps_limit
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_nanos(1_000_000_000 / fps as u64))
    }

    /// Path of the class diagram file
    #[must_use]
    pub fn diagram_path(&self) -> PathBuf {
        Path::new(&self.diagram_output_dir).join(format!("{}.wsd", self.diagram_file))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window_mode(mut self, mode: WindowMode) -> Self {
        self.window_mode = mode;
        self
    }

    /// Set the window size in pixels
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_width = Some(width);
        self.window_height = Some(height);
        self
    }

    pub fn with_window_position(mut self, x: i32, y: i32) -> Self {
        self.window_x = Some(x);
        self.window_y = Some(y);
        self
    }

    /// Cap the frame rate; `None` for unlimited
    pub fn with_fps_limit(mut self, fps: Option<i32>) -> Self {
        self.fps_limit = fps;
        self
    }

    /// Milliseconds between two act cycles
    pub fn with_world_speed(mut self, millis: i32) -> Self {
        self.world_speed = millis.max(0);
        self
    }

    pub fn with_image_folder(mut self, folder: impl Into<String>) -> Self {
        self.image_folder = folder.into();
        self
    }

    pub fn with_sound_folder(mut self, folder: impl Into<String>) -> Self {
        self.sound_folder = folder.into();
        self
    }

    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    pub fn with_generate_diagram(mut self, generate: bool) -> Self {
        self.generate_diagram = generate;
        self
    }

    /// Where the diagram written on start reads sources and puts its file
    pub fn with_diagram_dirs(
        mut self,
        source_dir: impl Into<String>,
        output_dir: impl Into<String>,
    ) -> Self {
        self.diagram_source_dir = source_dir.into();
        self.diagram_output_dir = output_dir.into();
        self
    }
}

/// One `key=value` line being parsed
struct Entry<'a> {
    line: usize,
    key: &'a str,
    value: &'a str,
}

impl Entry<'_> {
    fn invalid(&self, expected: &'static str) -> ConfigError {
        ConfigError::InvalidValue {
            line: self.line,
            key: self.key.to_string(),
            value: self.value.to_string(),
            expected,
        }
    }

    fn string(&self) -> String {
        let v = self.value;
        if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
            v[1..v.len() - 1].to_string()
        } else {
            v.to_string()
        }
    }

    fn boolean(&self) -> Result<bool, ConfigError> {
        match self.value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid("a boolean")),
        }
    }

    fn int(&self) -> Result<i32, ConfigError> {
        self.value
            .parse::<i32>()
            .map_err(|_| self.invalid("an integer"))
    }

    fn optional_int(&self) -> Result<Option<i32>, ConfigError> {
        if self.value.is_empty() || self.value.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        self.value
            .parse::<i32>()
            .map(Some)
            .map_err(|_| self.invalid("an integer or none"))
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read
    IoError { path: PathBuf, message: String },
    /// A line is not of the form `key=value`
    Malformed { line: usize },
    /// A value does not fit its key
    InvalidValue {
        line: usize,
        key: String,
        value: String,
        expected: &'static str,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError { path, message } => {
                write!(f, "cannot read {}: {message}", path.display())
            }
            Self::Malformed { line } => write!(f, "line {line}: expected key=value"),
            Self::InvalidValue {
                line,
                key,
                value,
                expected,
            } => write!(f, "line {line}: '{value}' is not valid for {key}, expected {expected}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.title, "Greenfoot");
        assert_eq!(config.fps_limit, Some(60));
        assert_eq!(config.window_mode, WindowMode::Resizable);
        assert_eq!(config.world_speed(), Duration::ZERO);
    }

    #[test]
    fn test_parse_values() {
        let text = "
            # comment
            title = \"My Game\"
            windowMode=FullScreen
            windowWidth=800
            windowHeight = none
            fpsLimit=
            worldSpeed=50
            showFps=yes
            generateDiagram=0
            diagramIgnore=tests, benches
        ";
        let config = Config::parse(text).unwrap();
        assert_eq!(config.title, "My Game");
        assert_eq!(config.window_mode, WindowMode::Fullscreen);
        assert_eq!(config.window_width, Some(800));
        assert_eq!(config.window_height, None);
        assert_eq!(config.fps_limit, None);
        assert_eq!(config.frame_interval(), None);
        assert_eq!(config.world_speed(), Duration::from_millis(50));
        assert!(config.show_fps);
        assert!(!config.generate_diagram);
        assert_eq!(config.diagram_ignore, vec!["tests", "benches"]);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let config = Config::parse("title=a=b").unwrap();
        assert_eq!(config.title, "a=b");
    }

    #[test]
    fn test_malformed_line() {
        assert_eq!(
            Config::parse("title=x\nnonsense"),
            Err(ConfigError::Malformed { line: 2 })
        );
        assert_eq!(Config::parse("=5"), Err(ConfigError::Malformed { line: 1 }));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::parse("\n\nshowFps=maybe").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { line: 3, ref key, .. } if key == "showFps"));
        assert!(Config::parse("fpsLimit=0").is_err());
        assert!(Config::parse("worldSpeed=-1").is_err());
        assert!(Config::parse("windowMode=tiny").is_err());
        assert!(Config::parse("windowX=abc").is_err());
    }

    #[test]
    fn test_unknown_key_ignored_and_last_duplicate_wins() {
        let config = Config::parse("foo=bar\nworldSpeed=10\nworldSpeed=20").unwrap();
        assert_eq!(config.world_speed, 20);
    }

    #[test]
    fn test_cfg_string_round_trips() {
        let config = Config::default()
            .with_title("Round trip")
            .with_window_size(640, 480)
            .with_fps_limit(None)
            .with_world_speed(15)
            .with_show_fps(true);
        let mut config = config.with_diagram_dirs("src", "docs/uml");
        config.diagram_ignore = vec![String::from("a"), String::from("b")];
        assert_eq!(Config::parse(&config.to_cfg_string()).unwrap(), config);
    }

    #[test]
    fn test_frame_interval() {
        let config = Config::default().with_fps_limit(Some(50));
        assert_eq!(config.frame_interval(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
        assert!(matches!(
            Config::load(dir.path().join(CONFIG_FILE)),
            Err(ConfigError::IoError { .. })
        ));
    }

    #[test]
    fn test_diagram_path() {
        let config = Config::default();
        assert_eq!(config.diagram_path(), Path::new("_structure").join("diagram.wsd"));
    }
}
