use crate::cli::OutputFormat;
use crate::error::Result;
use nalgebra::Vector3;
use singlepoint::core::forcefield::report::{
    EnergyGroups, GROUP_COLUMNS, THERMO_COLUMNS, ThermoReport,
};
use std::collections::BTreeMap;
use std::io::Write;

const LABEL_WIDTH: usize = 14;

/// Renders the energy report as `label  value` lines, in thermo column order.
///
/// Group totals, when given, follow the terms after a blank line.
pub fn render_table(report: &ThermoReport, groups: Option<&EnergyGroups>) -> String {
    let mut out = String::new();
    for (label, value) in report.columns() {
        out.push_str(&table_line(label, value));
    }
    if let Some(groups) = groups {
        out.push('\n');
        for (label, value) in groups.columns() {
            out.push_str(&table_line(label, value));
        }
    }
    out
}

fn table_line(label: &str, value: f64) -> String {
    format!("{:<width$} {:>20.10}\n", label, value, width = LABEL_WIDTH)
}

pub fn write_report(
    report: &ThermoReport,
    groups: Option<&EnergyGroups>,
    format: OutputFormat,
    writer: impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut writer = writer;
            writer.write_all(render_table(report, groups).as_bytes())?;
            writer.flush()?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            match groups {
                None => csv_writer.serialize(report)?,
                Some(groups) => {
                    csv_writer.write_record(THERMO_COLUMNS.iter().chain(&GROUP_COLUMNS))?;
                    let values: Vec<f64> =
                        report.values().into_iter().chain(groups.values()).collect();
                    csv_writer.serialize(values)?;
                }
            }
            csv_writer.flush()?;
        }
    }
    Ok(())
}

/// Writes one `id,fx,fy,fz` row per atom in ascending id order.
pub fn write_forces(forces: &BTreeMap<usize, Vector3<f64>>, writer: impl Write) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["id", "fx", "fy", "fz"])?;
    for (serial, force) in forces {
        csv_writer.write_record([
            serial.to_string(),
            force.x.to_string(),
            force.y.to_string(),
            force.z.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ThermoReport {
        ThermoReport {
            ebond: 50.0,
            eangle: 0.0,
            edihed: 0.0,
            eimp: 0.0,
            epair: -0.25,
            evdwl: -0.25,
            ecoul: 0.0,
            elong: 0.0,
            etail: 0.0,
            pe: 49.75,
        }
    }

    #[test]
    fn table_lists_every_term_in_order() {
        let table = render_table(&sample(), None);
        let labels: Vec<&str> = table
            .lines()
            .map(|line| line.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec![
                "E_bond", "E_angle", "E_dihed", "E_impro", "E_pair", "E_vdwl", "E_coul", "E_long",
                "E_tail", "PotEng"
            ]
        );
        assert!(table.lines().last().unwrap().ends_with("49.7500000000"));
    }

    #[test]
    fn csv_has_header_and_one_row() {
        let mut buffer = Vec::new();
        write_report(&sample(), None, OutputFormat::Csv, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "E_bond,E_angle,E_dihed,E_impro,E_pair,E_vdwl,E_coul,E_long,E_tail,PotEng"
        );
        assert_eq!(lines.next().unwrap(), "50.0,0.0,0.0,0.0,-0.25,-0.25,0.0,0.0,0.0,49.75");
        assert!(lines.next().is_none());
    }

    fn sample_groups() -> EnergyGroups {
        EnergyGroups {
            dispersive: -0.25,
            electrostatic: 0.0,
            non_bonded: -0.25,
            all_dihedrals: 0.0,
        }
    }

    #[test]
    fn table_appends_groups_after_a_blank_line() {
        let table = render_table(&sample(), Some(&sample_groups()));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 15);
        assert!(lines[10].is_empty());
        assert!(lines[11].starts_with("Dispersive"));
        assert!(lines[14].starts_with("All dihedrals"));
        assert!(lines[14].ends_with("0.0000000000"));
    }

    #[test]
    fn csv_with_groups_extends_the_row() {
        let mut buffer = Vec::new();
        let groups = sample_groups();
        write_report(&sample(), Some(&groups), OutputFormat::Csv, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "E_bond,E_angle,E_dihed,E_impro,E_pair,E_vdwl,E_coul,E_long,E_tail,PotEng,\
             Dispersive,Electrostatic,Non-bonded,All dihedrals"
        );
        assert_eq!(
            lines.next().unwrap(),
            "50.0,0.0,0.0,0.0,-0.25,-0.25,0.0,0.0,0.0,49.75,-0.25,0.0,-0.25,0.0"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn forces_are_written_by_ascending_id() {
        let forces = BTreeMap::from([
            (2, Vector3::new(-100.0, 0.0, 0.0)),
            (1, Vector3::new(100.0, 0.0, 0.0)),
        ]);
        let mut buffer = Vec::new();
        write_forces(&forces, &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "id,fx,fy,fz\n1,100,0,0\n2,-100,0,0\n"
        );
    }
}
