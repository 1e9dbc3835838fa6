use crate::config::Config;
use crate::data::{
    BenchmarkSnapshot, DeviceFacts, SensorKind, SensorSnapshot, Stage, SystemLoad, NOT_AVAILABLE,
};
use unicode_width::UnicodeWidthStr;

const RESET: &str = "\x1b[0m";

pub fn hex_to_ansi(color: &str) -> String {
    // First try ANSI color names
    if let Some(ansi_code) = get_ansi_color_code(color) {
        return ansi_code.to_string();
    }

    // Fallback to hex color parsing for custom colors
    if color.starts_with('#') && color.len() == 7 && color.is_ascii() {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&color[1..3], 16),
            u8::from_str_radix(&color[3..5], 16),
            u8::from_str_radix(&color[5..7], 16),
        ) {
            return format!("\x1b[38;2;{};{};{}m", r, g, b);
        }
    }

    tracing::warn!(color, "Unknown color, using default");
    RESET.to_string()
}

fn get_ansi_color_code(color_name: &str) -> Option<&'static str> {
    let code = match color_name.to_lowercase().as_str() {
        // Standard 8 colors (30-37)
        "black" => "\x1b[30m",
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" | "purple" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",

        // Bright colors (90-97)
        "bright_black" | "gray" | "grey" => "\x1b[90m",
        "bright_red" | "orange" => "\x1b[91m",
        "bright_green" => "\x1b[92m",
        "bright_yellow" => "\x1b[93m",
        "bright_blue" => "\x1b[94m",
        "bright_magenta" | "violet" => "\x1b[95m",
        "bright_cyan" => "\x1b[96m",
        "bright_white" => "\x1b[97m",

        "reset" | "default" => RESET,
        _ => return None,
    };
    Some(code)
}

/// Turns facts, sensor and benchmark snapshots into aligned `key: value` lines
pub struct Renderer {
    separator: String,
    key_color: String,
    value_color: String,
}

impl Renderer {
    pub fn from_config(config: &Config) -> Self {
        // A color may name an entry in [colors] or be a literal ANSI name / hex value
        let resolve = |name: &Option<String>| match name {
            Some(name) => hex_to_ansi(config.colors.get(name).unwrap_or(name)),
            None => RESET.to_string(),
        };

        Self {
            separator: config.display.separator.clone(),
            key_color: resolve(&config.display.key_color),
            value_color: resolve(&config.display.value_color),
        }
    }

    /// Uncolored renderer, used for logs and tests
    pub fn plain(separator: &str) -> Self {
        Self {
            separator: separator.to_string(),
            key_color: String::new(),
            value_color: String::new(),
        }
    }

    fn lines(&self, title: &str, rows: &[(String, String)]) -> Vec<String> {
        let width = rows
            .iter()
            .map(|(key, _)| UnicodeWidthStr::width(key.as_str()))
            .max()
            .unwrap_or(0);

        let reset = if self.key_color.is_empty() && self.value_color.is_empty() {
            ""
        } else {
            RESET
        };

        let mut out = Vec::with_capacity(rows.len() + 1);
        out.push(title.to_string());
        for (key, value) in rows {
            let padding = " ".repeat(width - UnicodeWidthStr::width(key.as_str()));
            out.push(format!(
                "  {}{}{}{}{}{}{}{}",
                self.key_color, key, reset, self.separator, padding, self.value_color, value, reset
            ));
        }
        out
    }

    pub fn render_facts(&self, facts: &DeviceFacts) -> Vec<String> {
        let mut rows = vec![
            row("Device", &facts.device_name),
            row("Model", &facts.model),
            row("Identifier", &facts.identifier),
            row("Year", facts.year),
            row("System", &facts.os_version),
            row("CPU", &facts.cpu_name),
            row("Cores", &facts.cpu_cores),
            row("Memory", &facts.physical_memory),
            row("Storage", &facts.total_storage),
            row("Available", &facts.available_storage),
            row("Screen", &facts.screen.diagonal),
            row("Resolution", &facts.screen.resolution),
            row("Scale", &facts.screen.scale),
            row("Display", facts.screen.refresh_class),
        ];
        rows.extend(
            facts
                .capabilities
                .labeled()
                .iter()
                .map(|(label, on)| row(label, if *on { "yes" } else { "no" })),
        );
        self.lines("Device", &rows)
    }

    pub fn render_sensors(&self, snapshot: &SensorSnapshot) -> Vec<String> {
        let mut rows: Vec<(String, String)> = SensorKind::ALL
            .iter()
            .map(|kind| row(kind.label(), snapshot.availability(*kind).status()))
            .collect();

        let vector = |v: crate::data::SensorReading, magnitude: f64| {
            format!("x {:+.3}  y {:+.3}  z {:+.3}  |{:.3}|", v.x, v.y, v.z, magnitude)
        };
        rows.push(row(
            "Acceleration (g)",
            vector(snapshot.acceleration, snapshot.acceleration_magnitude()),
        ));
        rows.push(row(
            "Rotation (rad/s)",
            vector(snapshot.rotation_rate, snapshot.rotation_magnitude()),
        ));
        rows.push(row(
            "Magnetic (µT)",
            vector(snapshot.magnetic_field, snapshot.magnetic_magnitude()),
        ));
        rows.push(row(
            "Attitude (°)",
            format!(
                "roll {:+.1}  pitch {:+.1}  yaw {:+.1}",
                snapshot.attitude.roll.to_degrees(),
                snapshot.attitude.pitch.to_degrees(),
                snapshot.attitude.yaw.to_degrees()
            ),
        ));
        self.lines("Sensors", &rows)
    }

    pub fn render_benchmark(&self, snapshot: &BenchmarkSnapshot) -> Vec<String> {
        if snapshot.is_running() {
            let stage = snapshot.stage.map(|s| s.to_string()).unwrap_or_default();
            return self.lines(
                "Benchmark running",
                &[
                    row("Progress", format!("{:.0}%", snapshot.progress * 100.0)),
                    row("Stage", stage),
                ],
            );
        }
        if !snapshot.has_results {
            return self.lines("Benchmark", &[row("Results", NOT_AVAILABLE)]);
        }

        let mut rows: Vec<(String, String)> = Stage::ORDER
            .iter()
            .map(|stage| {
                row(&stage.to_string(), format!("{} points", snapshot.result.score(*stage)))
            })
            .collect();
        rows.push(row("Total Score", format!("{} points", snapshot.total_score())));
        self.lines("Benchmark results", &rows)
    }

    pub fn render_load(&self, load: &SystemLoad) -> Vec<String> {
        let cpu = load
            .cpu_usage
            .map(|pct| format!("{:.1}%", pct))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        self.lines(
            "System",
            &[
                row("CPU Usage", cpu),
                row("Memory Used", &load.memory_used),
                row("Memory Available", &load.memory_available),
            ],
        )
    }
}

fn row(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}
