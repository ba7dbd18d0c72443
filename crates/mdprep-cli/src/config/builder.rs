use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, ToolsConfig};
use crate::cli::{RemovalArgs, RunArgs};
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use mdprep::core::io::hetatm::{ExclusionSet, ResiduePreset};
use mdprep::engine::config::{InputSource, OutputFiles, PipelineConfigBuilder};
use mdprep::engine::tasks::command::ToolCommand;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Location of the per-user config file, e.g. `~/.config/mdprep/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("edu", "caltech", "mdprep").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Reads the explicitly requested config file, or the per-user one if it
/// exists. A missing explicit file is an error; a missing default is not.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return FileConfig::from_file(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => FileConfig::from_file(&path),
        _ => {
            debug!("No configuration file found; using built-in defaults.");
            Ok(FileConfig::default())
        }
    }
}

pub fn build_config(args: &RunArgs, file_config: FileConfig) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let tools = build_tools_config(&file_config)?;
    let exclusions = resolve_exclusions(&args.removal, &file_config);

    let source = match (&args.source.pdb_id, &args.source.input) {
        (Some(id), None) => InputSource::Download(id.clone()),
        (None, Some(path)) => InputSource::LocalFile(path.clone()),
        _ => {
            return Err(CliError::Argument(
                "Exactly one of --pdb-id or --input is required.".to_string(),
            ));
        }
    };

    let output_file = file_config.output.take().unwrap_or_default();
    let work_dir = args
        .work_dir
        .clone()
        .or(output_file.work_dir)
        .unwrap_or(defaults.work_dir);
    let files = OutputFiles {
        raw: output_file.raw.unwrap_or(defaults.files.raw),
        fixed: output_file.fixed.unwrap_or(defaults.files.fixed),
        cleaned: output_file.cleaned.unwrap_or(defaults.files.cleaned),
    };

    let repair_file = file_config.repair.take().unwrap_or_default();
    let repair_enabled = !args.no_repair && repair_file.enabled.unwrap_or(defaults.repair_enabled);
    let ph = args.ph.or(repair_file.ph).unwrap_or(defaults.ph);

    let sim_file = file_config.simulation.take().unwrap_or_default();
    let simulation_enabled =
        !args.no_simulate && sim_file.enabled.unwrap_or(defaults.simulation_enabled);
    let steps = args
        .steps
        .or(sim_file.steps)
        .unwrap_or(defaults.simulation_steps);

    let pipeline = PipelineConfigBuilder::new()
        .source(source)
        .work_dir(work_dir)
        .files(files)
        .repair(repair_enabled)
        .ph(ph)
        .exclusions(exclusions)
        .simulation(simulation_enabled)
        .simulation_steps(steps)
        .ligand(args.ligand.clone().or(sim_file.ligand))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig { pipeline, tools })
}

pub fn build_tools_config(file_config: &FileConfig) -> Result<ToolsConfig> {
    let defaults = DefaultsConfig::default();

    let download = file_config.download.clone().unwrap_or_default();
    let download_base_url = download.base_url.unwrap_or(defaults.download_base_url);
    if download_base_url.trim().is_empty() {
        return Err(CliError::Config(
            "`download.base-url` cannot be empty.".to_string(),
        ));
    }
    let timeout_secs = download
        .timeout_secs
        .unwrap_or(defaults.download_timeout_secs);
    if timeout_secs == 0 {
        return Err(CliError::Config(
            "`download.timeout-secs` must be greater than zero.".to_string(),
        ));
    }

    let pdbfixer = tool_command(
        "repair.command",
        file_config
            .repair
            .as_ref()
            .and_then(|r| r.command.as_deref()),
        &defaults.pdbfixer_command,
    )?;
    let python = tool_command(
        "simulation.python",
        file_config
            .simulation
            .as_ref()
            .and_then(|s| s.python.as_deref()),
        &defaults.python_command,
    )?;

    Ok(ToolsConfig {
        download_base_url,
        download_timeout: Duration::from_secs(timeout_secs),
        pdbfixer,
        python,
    })
}

/// Residues named on the command line win over the `[filter]` section as a
/// whole; the two are never merged.
pub fn resolve_exclusions(removal: &RemovalArgs, file_config: &FileConfig) -> ExclusionSet {
    let (names, presets) = if removal.is_empty() {
        let filter = file_config.filter.clone().unwrap_or_default();
        (
            filter.remove_residues.unwrap_or_default(),
            filter.presets.unwrap_or_default(),
        )
    } else {
        (removal.remove.clone(), removal.preset.clone())
    };

    let mut exclusions: ExclusionSet = names.iter().collect();
    for preset in presets {
        exclusions.extend_with_preset(preset);
    }
    exclusions
}

fn tool_command(
    key: &str,
    file_val: Option<&[String]>,
    default_val: &[String],
) -> Result<ToolCommand> {
    ToolCommand::from_words(file_val.unwrap_or(default_val)).ok_or_else(|| {
        CliError::Config(format!(
            "`{}` must start with the name of a program.",
            key
        ))
    })
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn parse_list(value_str: &str) -> Vec<String> {
    value_str
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "output.work-dir" => {
                config.output.get_or_insert_with(Default::default).work_dir =
                    Some(PathBuf::from(value_str));
            }
            "output.raw" => {
                config.output.get_or_insert_with(Default::default).raw =
                    Some(PathBuf::from(value_str));
            }
            "output.fixed" => {
                config.output.get_or_insert_with(Default::default).fixed =
                    Some(PathBuf::from(value_str));
            }
            "output.cleaned" => {
                config.output.get_or_insert_with(Default::default).cleaned =
                    Some(PathBuf::from(value_str));
            }
            "download.base-url" => {
                config.download.get_or_insert_with(Default::default).base_url =
                    Some(value_str.to_string());
            }
            "download.timeout-secs" => {
                config
                    .download
                    .get_or_insert_with(Default::default)
                    .timeout_secs = Some(parse_value(key, value_str, "integer")?);
            }
            "repair.enabled" => {
                config.repair.get_or_insert_with(Default::default).enabled =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "repair.ph" => {
                config.repair.get_or_insert_with(Default::default).ph =
                    Some(parse_value(key, value_str, "float")?);
            }
            "repair.command" => {
                config.repair.get_or_insert_with(Default::default).command =
                    Some(value_str.split_whitespace().map(str::to_string).collect());
            }
            "filter.remove-residues" => {
                config
                    .filter
                    .get_or_insert_with(Default::default)
                    .remove_residues = Some(parse_list(value_str));
            }
            "filter.presets" => {
                let presets = parse_list(value_str)
                    .iter()
                    .map(|name| ResiduePreset::from_str(name))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))?;
                config.filter.get_or_insert_with(Default::default).presets = Some(presets);
            }
            "simulation.enabled" => {
                config.simulation.get_or_insert_with(Default::default).enabled =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "simulation.steps" => {
                config.simulation.get_or_insert_with(Default::default).steps =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "simulation.python" => {
                config.simulation.get_or_insert_with(Default::default).python =
                    Some(value_str.split_whitespace().map(str::to_string).collect());
            }
            "simulation.ligand" => {
                config.simulation.get_or_insert_with(Default::default).ligand =
                    Some(PathBuf::from(value_str));
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SourceArgs;
    use mdprep::core::models::ids::StructureId;
    use mdprep::engine::config::{DEFAULT_PH, DEFAULT_SIMULATION_STEPS, RepairConfig};
    use std::ffi::OsString;
    use std::fs;
    use tempfile::tempdir;

    fn base_run_args() -> RunArgs {
        RunArgs {
            source: SourceArgs {
                pdb_id: Some(StructureId::new("6lkd").unwrap()),
                input: None,
            },
            work_dir: None,
            removal: RemovalArgs::default(),
            ph: None,
            steps: None,
            ligand: None,
            no_repair: false,
            no_simulate: false,
            set_values: vec![],
        }
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("mdprep.toml");
        fs::write(&path, content).unwrap();
        path
    }

    const FULL_CONFIG: &str = r#"
        [output]
        work-dir = "runs/6lkd"
        cleaned = "clean.pdb"

        [download]
        base-url = "http://mirror.example/download"
        timeout-secs = 30

        [repair]
        command = ["conda", "run", "-n", "md", "pdbfixer"]
        ph = 6.5

        [filter]
        remove-residues = ["fad", "so4"]
        presets = ["water"]

        [simulation]
        python = ["/opt/md/bin/python"]
        steps = 5000
        "#;

    #[test]
    fn build_config_uses_defaults_without_file() {
        let app = build_config(&base_run_args(), FileConfig::default()).expect("build ok");
        let cfg = app.pipeline;

        assert_eq!(
            cfg.source,
            InputSource::Download(StructureId::new("6LKD").unwrap())
        );
        assert_eq!(cfg.work_dir, PathBuf::from("."));
        assert_eq!(cfg.files, OutputFiles::default());
        assert_eq!(cfg.repair, Some(RepairConfig { ph: DEFAULT_PH }));
        assert!(cfg.exclusions.is_empty());
        assert_eq!(
            cfg.simulation.as_ref().map(|s| s.steps),
            Some(DEFAULT_SIMULATION_STEPS)
        );

        assert_eq!(app.tools.download_base_url, "https://files.rcsb.org/download");
        assert_eq!(app.tools.download_timeout, Duration::from_secs(120));
        assert_eq!(app.tools.pdbfixer, ToolCommand::new("pdbfixer"));
        assert_eq!(app.tools.python, ToolCommand::new("python3"));
    }

    #[test]
    fn build_config_reads_file_and_merges() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), FULL_CONFIG);

        let file = load_file_config(Some(&path)).unwrap();
        let app = build_config(&base_run_args(), file).expect("build ok");
        let cfg = app.pipeline;

        assert_eq!(cfg.work_dir, PathBuf::from("runs/6lkd"));
        assert_eq!(cfg.cleaned_path(), PathBuf::from("runs/6lkd/clean.pdb"));
        assert_eq!(cfg.files.raw, PathBuf::from("protein.pdb"));
        assert_eq!(cfg.repair, Some(RepairConfig { ph: 6.5 }));
        assert!(cfg.exclusions.contains("FAD"));
        assert!(cfg.exclusions.contains("SO4"));
        assert!(cfg.exclusions.contains("HOH"));
        assert_eq!(cfg.simulation.as_ref().map(|s| s.steps), Some(5000));

        assert_eq!(app.tools.download_base_url, "http://mirror.example/download");
        assert_eq!(app.tools.download_timeout, Duration::from_secs(30));
        assert_eq!(app.tools.pdbfixer.to_string(), "conda run -n md pdbfixer");
        assert_eq!(app.tools.python, ToolCommand::new("/opt/md/bin/python"));
    }

    #[test]
    fn cli_overrides_set_values_which_override_file() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), FULL_CONFIG);

        let mut args = base_run_args();
        args.set_values = vec![
            "repair.ph=7.0".to_string(),
            "simulation.steps=200".to_string(),
            "filter.remove-residues=EDO, GOL".to_string(),
            "filter.presets=".to_string(),
        ];
        args.steps = Some(50);

        let file = load_file_config(Some(&path)).unwrap();
        let cfg = build_config(&args, file).expect("build ok").pipeline;

        assert_eq!(cfg.repair, Some(RepairConfig { ph: 7.0 }));
        assert_eq!(cfg.simulation.as_ref().map(|s| s.steps), Some(50));
        assert_eq!(cfg.exclusions.to_string(), "EDO, GOL");
    }

    #[test]
    fn cli_removal_replaces_file_filter_section() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), FULL_CONFIG);

        let mut args = base_run_args();
        args.removal = RemovalArgs {
            remove: vec!["nag".to_string()],
            preset: vec![],
        };

        let file = load_file_config(Some(&path)).unwrap();
        let cfg = build_config(&args, file).expect("build ok").pipeline;

        assert_eq!(cfg.exclusions.to_string(), "NAG");
    }

    #[test]
    fn disable_flags_and_local_input() {
        let mut args = base_run_args();
        args.source = SourceArgs {
            pdb_id: None,
            input: Some(PathBuf::from("local.pdb")),
        };
        args.no_repair = true;
        args.set_values = vec!["simulation.enabled=false".to_string()];

        let cfg = build_config(&args, FileConfig::default())
            .expect("build ok")
            .pipeline;

        assert_eq!(cfg.source, InputSource::LocalFile(PathBuf::from("local.pdb")));
        assert!(cfg.repair.is_none());
        assert!(cfg.simulation.is_none());
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let cases = [
            vec!["repair.ph"],
            vec!["repair.ph=acidic"],
            vec!["optimization.num-solutions=3"],
            vec!["filter.presets=water,lipids"],
            vec!["repair.command= "],
            vec!["download.timeout-secs=0"],
        ];
        for set_values in cases {
            let mut args = base_run_args();
            args.set_values = set_values.iter().map(|s| s.to_string()).collect();
            let result = build_config(&args, FileConfig::default());
            assert!(
                matches!(result, Err(CliError::Config(_))),
                "expected a config error for {set_values:?}"
            );
        }
    }

    #[test]
    fn core_validation_surfaces_as_config_error() {
        let mut args = base_run_args();
        args.ph = Some(15.0);
        let result = build_config(&args, FileConfig::default());
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("ph")),
            _ => panic!("expected a config error"),
        }
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "[repair]\nph = 7.0\nforce = true\n");

        let result = load_file_config(Some(&path));

        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_explicit_config_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = load_file_config(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn repair_command_set_value_is_split_into_words() {
        let mut args = base_run_args();
        args.set_values = vec!["repair.command=micromamba run -n md pdbfixer".to_string()];

        let tools = build_config(&args, FileConfig::default())
            .expect("build ok")
            .tools;

        assert_eq!(tools.pdbfixer.program, PathBuf::from("micromamba"));
        assert_eq!(
            tools.pdbfixer.args,
            ["run", "-n", "md", "pdbfixer"].map(OsString::from)
        );
    }
}
