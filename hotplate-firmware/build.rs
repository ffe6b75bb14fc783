//! Build script for hotplate-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates hotplate.toml at compile time
//! - Generates the board configuration table from hotplate.toml

use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Must match `hotplate_core::config::MAX_PRESETS`
const MAX_PRESETS: usize = 8;

/// Must match `hotplate_core::config::MAX_PROFILE_TEMP_C`
const MAX_PROFILE_TEMP_C: i64 = 260;

/// Longest preset name that fits the display header
const MAX_NAME_LEN: usize = 20;

/// Integer keys in [control], with their allowed range
const CONTROL_INTEGERS: &[(&str, i64, i64)] = &[
    ("tick_period_ms", 50, 1000),
    ("lead_time_s", 0, 60),
    ("ramp_duty", 0, 255),
    ("soak_duty", 0, 255),
    ("hold_duty", 0, 255),
];

/// Float keys in [control], with their allowed range
const CONTROL_FLOATS: &[(&str, f64, f64)] = &[
    ("overshoot_margin_c", 0.0, 100.0),
    ("ambient_c", -20.0, 60.0),
    ("cooldown_c", 20.0, 100.0),
    ("max_run_s", 60.0, 3600.0),
    ("sensor_fault_above_c", 300.0, 1024.0),
    ("sensor_fallback_c", 0.0, 100.0),
];

const SETPOINTS: &[&str] = &["warmup_c", "free_heating_c", "free_cooling_c"];

fn main() {
    setup_linker();
    let config = validate_config();
    generate_board_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate hotplate.toml configuration at compile time
fn validate_config() -> toml::Value {
    println!("cargo:rerun-if-changed=hotplate.toml");

    let config_path = Path::new("hotplate.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: hotplate.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a hotplate.toml configuration file.       ║\n\
            ║  Please create one in the hotplate-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read hotplate.toml                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in hotplate.toml                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_presets(&config);
    validate_control(&config);
    validate_setpoints(&config);
    validate_outputs(&config);

    println!("cargo:warning=hotplate.toml validated successfully");
    config
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = match line.char_indices().nth(61) {
                Some((cut, _)) if line.chars().count() > 64 => format!("{}...", &line[..cut]),
                _ => line.to_string(),
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fail the build with every collected error for one section
fn report_errors(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate the [[preset]] table
fn validate_presets(config: &toml::Value) {
    let mut errors = Vec::new();

    let presets = match config.get("preset") {
        Some(toml::Value::Array(presets)) => presets,
        Some(_) => {
            report_errors(
                "Invalid preset configuration",
                &["presets must be given as [[preset]] tables".to_string()],
            );
            return;
        }
        None => {
            report_errors(
                "Missing required sections in hotplate.toml",
                &["Missing [[preset]] - at least one preset is required".to_string()],
            );
            return;
        }
    };

    if presets.is_empty() {
        errors.push("at least one [[preset]] is required".to_string());
    }
    if presets.len() > MAX_PRESETS {
        errors.push(format!("at most {} presets are supported", MAX_PRESETS));
    }

    for (i, preset) in presets.iter().enumerate() {
        let preset = match preset.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("preset {} must be a table", i));
                continue;
            }
        };

        match preset.get("name") {
            Some(toml::Value::String(name)) => {
                if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
                    errors.push(format!("preset {} name must be 1-{} chars", i, MAX_NAME_LEN));
                }
            }
            Some(_) => errors.push(format!("preset {} name must be a string", i)),
            None => errors.push(format!("preset {} missing 'name'", i)),
        }

        match preset.get("checkpoints") {
            Some(value) => match checkpoints(value) {
                Ok(points) => check_profile(i, &points, &mut errors),
                Err(e) => errors.push(format!("preset {} {}", i, e)),
            },
            None => errors.push(format!("preset {} missing 'checkpoints'", i)),
        }
    }

    report_errors("Invalid preset configuration", &errors);
}

/// Read `checkpoints` as four [temperature, time] pairs
fn checkpoints(value: &toml::Value) -> Result<[(i64, i64); 4], &'static str> {
    let list = value.as_array().ok_or("checkpoints must be an array")?;
    if list.len() != 4 {
        return Err("needs exactly 4 checkpoints");
    }

    let mut points = [(0, 0); 4];
    for (point, pair) in points.iter_mut().zip(list) {
        match pair.as_array().map(|p| p.as_slice()) {
            Some([temp, time]) => {
                let temp = temp.as_integer().ok_or("checkpoint values must be integers")?;
                let time = time.as_integer().ok_or("checkpoint values must be integers")?;
                *point = (temp, time);
            }
            _ => return Err("checkpoints must be [temperature, time] pairs"),
        }
    }
    Ok(points)
}

fn check_profile(index: usize, points: &[(i64, i64); 4], errors: &mut Vec<String>) {
    if points.iter().any(|&(temp, _)| !(0..=MAX_PROFILE_TEMP_C).contains(&temp)) {
        errors.push(format!(
            "preset {} temperatures must be 0-{}",
            index, MAX_PROFILE_TEMP_C
        ));
    }
    if points[0].1 < 0 || points.iter().any(|&(_, time)| time > i16::MAX as i64) {
        errors.push(format!("preset {} times must be 0-{}", index, i16::MAX));
    }
    if points.windows(2).any(|w| w[1].1 <= w[0].1) {
        errors.push(format!("preset {} times must strictly increase", index));
    }
}

/// Validate the optional [control] overrides
fn validate_control(config: &toml::Value) {
    let control = match config.get("control") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            report_errors(
                "Invalid control configuration",
                &["[control] must be a table".to_string()],
            );
            return;
        }
        None => return,
    };

    let mut errors = Vec::new();

    for (key, value) in control {
        if let Some(&(_, min, max)) = CONTROL_INTEGERS.iter().find(|(k, _, _)| k == key) {
            match value.as_integer() {
                Some(v) if (min..=max).contains(&v) => {}
                _ => errors.push(format!("[control] {} must be an integer {}-{}", key, min, max)),
            }
        } else if let Some(&(_, min, max)) = CONTROL_FLOATS.iter().find(|(k, _, _)| k == key) {
            match number(value) {
                Some(v) if (min..=max).contains(&v) => {}
                _ => errors.push(format!("[control] {} must be a number {}-{}", key, min, max)),
            }
        } else {
            errors.push(format!("[control] unknown key '{}'", key));
        }
    }

    report_errors("Invalid control configuration", &errors);
}

/// Validate the optional [setpoints] table
fn validate_setpoints(config: &toml::Value) {
    let setpoints = match config.get("setpoints") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            report_errors(
                "Invalid setpoint configuration",
                &["[setpoints] must be a table".to_string()],
            );
            return;
        }
        None => return,
    };

    let mut errors = Vec::new();

    for (key, value) in setpoints {
        if !SETPOINTS.contains(&key.as_str()) {
            errors.push(format!("[setpoints] unknown key '{}'", key));
            continue;
        }
        match value.as_integer() {
            Some(v) if (0..=MAX_PROFILE_TEMP_C).contains(&v) => {}
            _ => errors.push(format!(
                "[setpoints] {} must be an integer 0-{}",
                key, MAX_PROFILE_TEMP_C
            )),
        }
    }

    report_errors("Invalid setpoint configuration", &errors);
}

/// Validate the optional [heater] and [fan] tables
fn validate_outputs(config: &toml::Value) {
    let mut errors = Vec::new();

    for section in ["heater", "fan"] {
        let Some(value) = config.get(section) else {
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };
        for (key, value) in table {
            match key.as_str() {
                "active_low" if value.is_bool() => {}
                "active_low" => errors.push(format!("[{}] active_low must be true or false", section)),
                _ => errors.push(format!("[{}] unknown key '{}'", section, key)),
            }
        }
    }

    report_errors("Invalid output configuration", &errors);
}

fn number(value: &toml::Value) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|v| v as f64))
}

/// Write `board_config.rs` into OUT_DIR
///
/// Runs after validation, so every lookup here is known to succeed.
fn generate_board_config(config: &toml::Value) {
    let mut out = String::new();
    out.push_str("// Generated by build.rs from hotplate.toml. Do not edit.\n\n");

    let presets = config
        .get("preset")
        .and_then(|p| p.as_array())
        .cloned()
        .unwrap_or_default();

    writeln!(
        out,
        "pub const PRESETS: [::hotplate_core::profile::ThermalProfile; {}] = [",
        presets.len()
    )
    .unwrap();
    for preset in &presets {
        let name = preset.get("name").and_then(|n| n.as_str()).unwrap_or_default();
        let points = preset
            .get("checkpoints")
            .and_then(|c| checkpoints(c).ok())
            .unwrap_or_default();

        writeln!(out, "    ::hotplate_core::profile::ThermalProfile::new(").unwrap();
        writeln!(out, "        {:?},", name).unwrap();
        for (temp, time) in points {
            writeln!(
                out,
                "        ::hotplate_core::profile::Checkpoint::new({}, {}),",
                temp, time
            )
            .unwrap();
        }
        writeln!(out, "    ),").unwrap();
    }
    out.push_str("];\n\n");

    for section in ["heater", "fan"] {
        let active_low = config
            .get(section)
            .and_then(|s| s.get("active_low"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        writeln!(
            out,
            "pub const {}_ACTIVE_LOW: bool = {};",
            section.to_uppercase(),
            active_low
        )
        .unwrap();
    }
    out.push('\n');

    out.push_str("#[allow(unused_mut)]\n");
    out.push_str("pub fn control_config() -> ::hotplate_core::config::ControlConfig {\n");
    out.push_str("    let mut config = ::hotplate_core::config::ControlConfig::default();\n");
    if let Some(control) = config.get("control").and_then(|c| c.as_table()) {
        for (key, value) in control {
            if CONTROL_INTEGERS.iter().any(|(k, _, _)| k == key) {
                if let Some(v) = value.as_integer() {
                    writeln!(out, "    config.{} = {};", key, v).unwrap();
                }
            } else if let Some(v) = number(value) {
                writeln!(out, "    config.{} = {:?};", key, v as f32).unwrap();
            }
        }
    }
    if let Some(setpoints) = config.get("setpoints").and_then(|s| s.as_table()) {
        for (key, value) in setpoints {
            if let Some(v) = value.as_integer() {
                writeln!(out, "    config.setpoints.{} = {};", key, v).unwrap();
            }
        }
    }
    out.push_str("    config\n}\n");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("board_config.rs"), out).unwrap();
}
