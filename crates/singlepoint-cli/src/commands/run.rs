use crate::cli::{OutputFormat, RunArgs};
use crate::config::PartialRunConfig;
use crate::error::{CliError, Result};
use crate::report;
use crate::utils::progress::CliProgressHandler;
use singlepoint::engine::progress::ProgressReporter;
use singlepoint::workflows;
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

pub fn run(args: RunArgs, show_progress: bool) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialRunConfig::from_file(path)?,
        None => PartialRunConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(
        data = %config.data_path.display(),
        forcefield = %config.forcefield_path.display(),
        "Invoking the single-point evaluation workflow..."
    );
    let outcome = workflows::evaluate::run(&config, &reporter)?;
    let result = &outcome.result;
    info!(
        atoms = outcome.metadata.counts.atoms,
        pairs = result.pairs_evaluated,
        bonds = result.bonds_evaluated,
        "Workflow finished."
    );

    let groups = args.groups.then_some(&result.groups);
    match &args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            report::write_report(&result.report, groups, args.format, writer)?;
            println!("Energy report written to: {}", path.display());
        }
        None => {
            if args.format == OutputFormat::Table && !outcome.metadata.title.is_empty() {
                println!("# {}", outcome.metadata.title);
            }
            let writer = std::io::stdout().lock();
            report::write_report(&result.report, groups, args.format, writer)?;
        }
    }

    if let Some(path) = &args.forces_output {
        let forces = result.forces.as_ref().ok_or_else(|| {
            CliError::Argument(
                "Forces were disabled by the configuration; cannot write --forces-output."
                    .to_string(),
            )
        })?;
        report::write_forces(forces, BufWriter::new(File::create(path)?))?;
        println!("Per-atom forces written to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use serial_test::serial;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const DATA: &str = "\
Two atoms joined by a stretched harmonic bond

2 atoms
1 bonds
1 atom types
1 bond types

0.0 50.0 xlo xhi
0.0 50.0 ylo yhi
0.0 50.0 zlo zhi

Atoms # full

1 1 1 0.0 10.0 10.0 10.0
2 1 1 0.0 15.0 10.0 10.0

Bonds

1 1 1 2
";

    const SETTINGS: &str = r#"
[pair]
style = "lj/cut"
cutoff = 20.0

[pair.coeffs]
1 = { epsilon = 1.0, sigma = 3.5 }

[special-bonds]
lj = [0.0, 0.0, 0.5]

[bond]
styles = ["harmonic", "morse"]

[bond.coeffs]
1 = { style = "harmonic", k = 50.0, r0 = 4.0 }
"#;

    fn write_inputs(dir: &Path) -> (String, String) {
        let data = dir.join("system.data");
        let settings = dir.join("forcefield.toml");
        fs::write(&data, DATA).unwrap();
        fs::write(&settings, SETTINGS).unwrap();
        (data.display().to_string(), settings.display().to_string())
    }

    fn parse(argv: &[&str]) -> RunArgs {
        let mut full = vec!["singlepoint", "run"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Run(args) => args,
        }
    }

    #[test]
    #[serial]
    fn writes_csv_report_and_forces() {
        let dir = tempdir().unwrap();
        let (data, settings) = write_inputs(dir.path());
        let report_path = dir.path().join("energy.csv");
        let forces_path = dir.path().join("forces.csv");

        let args = parse(&[
            "-d",
            &data,
            "-f",
            &settings,
            "--format",
            "csv",
            "-o",
            report_path.to_str().unwrap(),
            "--forces-output",
            forces_path.to_str().unwrap(),
        ]);
        run(args, false).unwrap();

        let report = fs::read_to_string(report_path).unwrap();
        let mut lines = report.lines().skip(1);
        assert_eq!(lines.next().unwrap(), "50.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,50.0");

        let forces = fs::read_to_string(forces_path).unwrap();
        assert_eq!(forces, "id,fx,fy,fz\n1,100,0,0\n2,-100,0,0\n");
    }

    #[test]
    #[serial]
    fn groups_flag_adds_group_totals_to_the_table() {
        let dir = tempdir().unwrap();
        let (data, settings) = write_inputs(dir.path());
        let report_path = dir.path().join("energy.txt");

        let args = parse(&[
            "-d",
            &data,
            "-f",
            &settings,
            "--groups",
            "-o",
            report_path.to_str().unwrap(),
        ]);
        run(args, false).unwrap();

        let report = fs::read_to_string(report_path).unwrap();
        let groups: Vec<&str> = report.lines().skip_while(|line| !line.is_empty()).collect();
        assert_eq!(groups.len(), 5);
        for (line, label) in groups[1..]
            .iter()
            .zip(["Dispersive", "Electrostatic", "Non-bonded", "All dihedrals"])
        {
            assert!(line.starts_with(label));
            assert!(line.ends_with("0.0000000000"));
        }
    }

    #[test]
    #[serial]
    fn forces_output_requires_forces() {
        let dir = tempdir().unwrap();
        let (data, settings) = write_inputs(dir.path());
        let config_path = dir.path().join("run.toml");
        fs::write(&config_path, "[evaluation]\ncompute-forces = false\n").unwrap();
        let forces_path = dir.path().join("forces.csv");

        let args = parse(&[
            "-d",
            &data,
            "-f",
            &settings,
            "-c",
            config_path.to_str().unwrap(),
            "-o",
            dir.path().join("energy.txt").to_str().unwrap(),
            "--forces-output",
            forces_path.to_str().unwrap(),
        ]);
        let err = run(args, false).unwrap_err();
        assert!(matches!(err, CliError::Argument(_)));
        assert!(!forces_path.exists());
    }

    #[test]
    #[serial]
    fn invalid_settings_surface_as_core_errors() {
        let dir = tempdir().unwrap();
        let (data, _) = write_inputs(dir.path());
        let settings = dir.path().join("bad.toml");
        fs::write(&settings, SETTINGS.replace("lj/cut", "lj/charmm")).unwrap();

        let args = parse(&["-d", &data, "-f", settings.to_str().unwrap()]);
        let err = run(args, false).unwrap_err();
        assert!(matches!(err, CliError::Core(_)));
    }
}
