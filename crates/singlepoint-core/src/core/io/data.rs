use crate::core::forcefield::params::{CoefficientTable, LjParam, PositionalBondCoeff};
use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::system::{MolecularSystem, TopologyError};
use crate::core::utils::geometry::{BoxError, PeriodicBox};
use nalgebra::Point3;
use phf::phf_map;
use std::collections::BTreeMap;
use std::io::{self, BufRead};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Column layout of the `Atoms` section, selected by the comment after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AtomStyle {
    #[default]
    Full,
    Molecular,
    Bond,
    Charge,
    Atomic,
}

static ATOM_STYLES: phf::Map<&'static str, AtomStyle> = phf_map! {
    "full" => AtomStyle::Full,
    "molecular" => AtomStyle::Molecular,
    "bond" => AtomStyle::Bond,
    "charge" => AtomStyle::Charge,
    "atomic" => AtomStyle::Atomic,
};

impl AtomStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        ATOM_STYLES.get(name).copied()
    }

    fn has_molecule(self) -> bool {
        matches!(self, Self::Full | Self::Molecular | Self::Bond)
    }

    fn has_charge(self) -> bool {
        matches!(self, Self::Full | Self::Charge)
    }

    /// Number of columns before the optional image flags.
    fn columns(self) -> usize {
        5 + usize::from(self.has_molecule()) + usize::from(self.has_charge())
    }
}

/// Counts declared in the header, checked against the parsed sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataCounts {
    pub atoms: usize,
    pub bonds: usize,
    pub atom_types: usize,
    pub bond_types: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataMetadata {
    pub title: String,
    pub atom_style: AtomStyle,
    pub counts: DataCounts,
    pub masses: BTreeMap<usize, f64>,
    pub coefficients: CoefficientTable,
    /// Sections present in the file but not used by the evaluation.
    pub skipped_sections: Vec<String>,
}

#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: DataParseErrorKind,
    },
    #[error("Invalid box: {0}")]
    Geometry(#[from] BoxError),
    #[error("Invalid topology: {0}")]
    Topology(#[from] TopologyError),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum DataParseErrorKind {
    #[error("Invalid integer for {field} (value: '{value}')")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid number for {field} (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
    #[error("{section} line needs {expected} columns, found {found}")]
    WrongColumnCount {
        section: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Unknown section '{0}'")]
    UnknownSection(String),
    #[error("Unknown atom style '{0}'")]
    UnknownAtomStyle(String),
    #[error("Unrecognized header line '{0}'")]
    UnrecognizedHeader(String),
    #[error("Triclinic boxes are not supported")]
    TriclinicBox,
    #[error("Data line outside of any section")]
    OrphanLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Masses,
    Atoms,
    Bonds,
    PairCoeffs,
    BondCoeffs,
    Skipped,
}

static SECTIONS: phf::Map<&'static str, Section> = phf_map! {
    "Masses" => Section::Masses,
    "Atoms" => Section::Atoms,
    "Bonds" => Section::Bonds,
    "Pair Coeffs" => Section::PairCoeffs,
    "Bond Coeffs" => Section::BondCoeffs,
    "Velocities" => Section::Skipped,
    "Angles" => Section::Skipped,
    "Dihedrals" => Section::Skipped,
    "Impropers" => Section::Skipped,
    "Angle Coeffs" => Section::Skipped,
    "Dihedral Coeffs" => Section::Skipped,
    "Improper Coeffs" => Section::Skipped,
};

/// Splits a line into its content and the text of a trailing `#` comment.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once('#') {
        Some((content, comment)) => (content.trim(), Some(comment.trim())),
        None => (line.trim(), None),
    }
}

fn parse_int<T: FromStr>(
    token: &str,
    field: &'static str,
    line: usize,
) -> Result<T, DataFileError> {
    token.parse().map_err(|_| DataFileError::Parse {
        line,
        kind: DataParseErrorKind::InvalidInt {
            field,
            value: token.to_string(),
        },
    })
}

fn parse_float(token: &str, field: &'static str, line: usize) -> Result<f64, DataFileError> {
    token.parse().map_err(|_| DataFileError::Parse {
        line,
        kind: DataParseErrorKind::InvalidFloat {
            field,
            value: token.to_string(),
        },
    })
}

fn expect_columns(
    tokens: &[&str],
    section: &'static str,
    allowed: &[usize],
    line: usize,
) -> Result<(), DataFileError> {
    if allowed.contains(&tokens.len()) {
        Ok(())
    } else {
        Err(DataFileError::Parse {
            line,
            kind: DataParseErrorKind::WrongColumnCount {
                section,
                expected: allowed[0],
                found: tokens.len(),
            },
        })
    }
}

struct PendingBond {
    line: usize,
    serial: usize,
    bond_type: usize,
    atoms: (usize, usize),
}

#[derive(Default)]
struct Header {
    counts: DataCounts,
    lo: [f64; 3],
    hi: [f64; 3],
}

impl Header {
    fn new() -> Self {
        Self {
            lo: [-0.5; 3],
            hi: [0.5; 3],
            ..Self::default()
        }
    }

    fn parse_line(&mut self, content: &str, line: usize) -> Result<(), DataFileError> {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        let unrecognized = || DataFileError::Parse {
            line,
            kind: DataParseErrorKind::UnrecognizedHeader(content.to_string()),
        };

        match tokens.as_slice() {
            [lo, hi, axis_lo, axis_hi] if axis_lo.ends_with("lo") && axis_hi.ends_with("hi") => {
                let axis = match (*axis_lo, *axis_hi) {
                    ("xlo", "xhi") => 0,
                    ("ylo", "yhi") => 1,
                    ("zlo", "zhi") => 2,
                    _ => return Err(unrecognized()),
                };
                self.lo[axis] = parse_float(lo, "box lower bound", line)?;
                self.hi[axis] = parse_float(hi, "box upper bound", line)?;
            }
            [_, _, _, "xy", "xz", "yz"] => {
                return Err(DataFileError::Parse {
                    line,
                    kind: DataParseErrorKind::TriclinicBox,
                });
            }
            [count, keyword] => {
                let count: usize = parse_int(count, "header count", line)?;
                match *keyword {
                    "atoms" => self.counts.atoms = count,
                    "bonds" => self.counts.bonds = count,
                    "angles" | "dihedrals" | "impropers" | "ellipsoids" | "lines"
                    | "triangles" | "bodies" => {}
                    _ => return Err(unrecognized()),
                }
            }
            [count, kind, "types"] => {
                let count: usize = parse_int(count, "header count", line)?;
                match *kind {
                    "atom" => self.counts.atom_types = count,
                    "bond" => self.counts.bond_types = count,
                    "angle" | "dihedral" | "improper" => {}
                    _ => return Err(unrecognized()),
                }
            }
            [_, "extra", _, "per", "atom"] => {}
            _ => return Err(unrecognized()),
        }
        Ok(())
    }
}

/// Reader for LAMMPS-style data files.
///
/// Supported sections are `Masses`, `Atoms`, `Bonds`, `Pair Coeffs` and `Bond Coeffs`.
/// `Velocities` and the angle, dihedral and improper sections are skipped.
pub struct DataFile;

impl DataFile {
    fn parse_atom(
        tokens: &[&str],
        style: AtomStyle,
        line: usize,
    ) -> Result<Atom, DataFileError> {
        let base = style.columns();
        expect_columns(tokens, "Atoms", &[base, base + 3], line)?;

        let mut column = tokens.iter();
        let mut next = || column.next().copied().unwrap_or_default();
        let serial = parse_int(next(), "atom id", line)?;
        let molecule = if style.has_molecule() {
            parse_int(next(), "molecule id", line)?
        } else {
            0
        };
        let type_id = parse_int(next(), "atom type", line)?;
        let charge = if style.has_charge() {
            parse_float(next(), "charge", line)?
        } else {
            0.0
        };
        let x = parse_float(next(), "x coordinate", line)?;
        let y = parse_float(next(), "y coordinate", line)?;
        let z = parse_float(next(), "z coordinate", line)?;

        let mut atom = Atom::new(serial, type_id, Point3::new(x, y, z));
        atom.molecule = molecule;
        atom.charge = charge;
        // Image flags are checked but unused: distances follow the minimum image.
        if tokens.len() == base + 3 {
            for _ in 0..3 {
                parse_int::<i32>(next(), "image flag", line)?;
            }
        }
        Ok(atom)
    }

    fn parse_bond(tokens: &[&str], line: usize) -> Result<PendingBond, DataFileError> {
        expect_columns(tokens, "Bonds", &[4], line)?;
        Ok(PendingBond {
            line,
            serial: parse_int(tokens[0], "bond id", line)?,
            bond_type: parse_int(tokens[1], "bond type", line)?,
            atoms: (
                parse_int(tokens[2], "bond atom", line)?,
                parse_int(tokens[3], "bond atom", line)?,
            ),
        })
    }

    fn parse_bond_coeff(
        tokens: &[&str],
        line: usize,
    ) -> Result<(usize, PositionalBondCoeff), DataFileError> {
        if tokens.len() < 2 {
            return Err(DataFileError::Parse {
                line,
                kind: DataParseErrorKind::WrongColumnCount {
                    section: "Bond Coeffs",
                    expected: 2,
                    found: tokens.len(),
                },
            });
        }
        let bond_type = parse_int(tokens[0], "bond type", line)?;
        let (style, values) = if tokens[1].parse::<f64>().is_ok() {
            (None, &tokens[1..])
        } else {
            (Some(tokens[1].to_string()), &tokens[2..])
        };
        let values = values
            .iter()
            .map(|token| parse_float(token, "bond coefficient", line))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((bond_type, PositionalBondCoeff { style, values }))
    }
}

impl MolecularFile for DataFile {
    type Metadata = DataMetadata;
    type Error = DataFileError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut metadata = DataMetadata::default();
        let mut header = Header::new();
        let mut system: Option<MolecularSystem> = None;
        let mut section: Option<Section> = None;
        let mut pending_bonds = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if line_num == 1 {
                metadata.title = line.trim().to_string();
                continue;
            }

            let (content, comment) = split_comment(&line);
            if content.is_empty() {
                continue;
            }

            if let Some(&next_section) = SECTIONS.get(content) {
                if system.is_none() {
                    let periodic_box = PeriodicBox::fully_periodic(header.lo, header.hi)?;
                    system = Some(MolecularSystem::new(periodic_box));
                }
                if next_section == Section::Atoms {
                    if let Some(name) = comment.filter(|c| !c.is_empty()) {
                        metadata.atom_style =
                            AtomStyle::from_name(name).ok_or_else(|| DataFileError::Parse {
                                line: line_num,
                                kind: DataParseErrorKind::UnknownAtomStyle(name.to_string()),
                            })?;
                    }
                }
                if next_section == Section::Skipped {
                    if content == "Velocities" {
                        debug!("Skipping Velocities section (zero-step evaluation)");
                    } else {
                        warn!(section = content, "Skipping section not evaluated by this engine");
                    }
                    metadata.skipped_sections.push(content.to_string());
                }
                section = Some(next_section);
                continue;
            }

            let tokens: Vec<&str> = content.split_whitespace().collect();
            let starts_with_word = content.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
            match (section, system.as_mut()) {
                (None, _) => {
                    if starts_with_word {
                        return Err(DataFileError::Parse {
                            line: line_num,
                            kind: DataParseErrorKind::UnknownSection(content.to_string()),
                        });
                    }
                    header.parse_line(content, line_num)?;
                }
                (Some(_), _) if starts_with_word => {
                    return Err(DataFileError::Parse {
                        line: line_num,
                        kind: DataParseErrorKind::UnknownSection(content.to_string()),
                    });
                }
                (Some(Section::Skipped), _) => {}
                (Some(Section::Masses), _) => {
                    expect_columns(&tokens, "Masses", &[2], line_num)?;
                    let type_id = parse_int(tokens[0], "atom type", line_num)?;
                    let mass = parse_float(tokens[1], "mass", line_num)?;
                    metadata.masses.insert(type_id, mass);
                }
                (Some(Section::Atoms), Some(system)) => {
                    let atom = Self::parse_atom(&tokens, metadata.atom_style, line_num)?;
                    system.add_atom(atom)?;
                }
                (Some(Section::Bonds), _) => {
                    pending_bonds.push(Self::parse_bond(&tokens, line_num)?);
                }
                (Some(Section::PairCoeffs), _) => {
                    expect_columns(&tokens, "Pair Coeffs", &[3], line_num)?;
                    let type_id = parse_int(tokens[0], "atom type", line_num)?;
                    let epsilon = parse_float(tokens[1], "epsilon", line_num)?;
                    let sigma = parse_float(tokens[2], "sigma", line_num)?;
                    metadata
                        .coefficients
                        .pair
                        .insert(type_id, LjParam { epsilon, sigma });
                }
                (Some(Section::BondCoeffs), _) => {
                    let (bond_type, coeff) = Self::parse_bond_coeff(&tokens, line_num)?;
                    metadata.coefficients.bond.insert(bond_type, coeff);
                }
                (Some(Section::Atoms), None) => {
                    return Err(DataFileError::Parse {
                        line: line_num,
                        kind: DataParseErrorKind::OrphanLine,
                    });
                }
            }
        }

        let mut system = match system {
            Some(system) => system,
            None => MolecularSystem::new(PeriodicBox::fully_periodic(header.lo, header.hi)?),
        };
        for bond in pending_bonds {
            debug!(line = bond.line, serial = bond.serial, "Adding bond");
            system.add_bond(bond.serial, bond.bond_type, bond.atoms.0, bond.atoms.1)?;
        }

        if system.atom_count() != header.counts.atoms {
            return Err(DataFileError::Inconsistency(format!(
                "header declares {} atoms but the Atoms section has {}",
                header.counts.atoms,
                system.atom_count()
            )));
        }
        if system.bonds().len() != header.counts.bonds {
            return Err(DataFileError::Inconsistency(format!(
                "header declares {} bonds but the Bonds section has {}",
                header.counts.bonds,
                system.bonds().len()
            )));
        }
        if let Some(atom) = system
            .atoms_iter()
            .map(|(_, atom)| atom)
            .find(|atom| header.counts.atom_types > 0 && atom.type_id > header.counts.atom_types)
        {
            return Err(DataFileError::Inconsistency(format!(
                "atom {} has type {} but only {} atom types are declared",
                atom.serial, atom.type_id, header.counts.atom_types
            )));
        }
        if let Some(bond) = system
            .bonds()
            .iter()
            .find(|bond| header.counts.bond_types > 0 && bond.bond_type > header.counts.bond_types)
        {
            return Err(DataFileError::Inconsistency(format!(
                "bond {} has type {} but only {} bond types are declared",
                bond.serial, bond.bond_type, header.counts.bond_types
            )));
        }

        metadata.counts = header.counts;
        Ok((system, metadata))
    }
}
