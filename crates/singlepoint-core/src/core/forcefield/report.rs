use super::term::EnergyTerm;
use serde::Serialize;

/// Read-only snapshot of one evaluation, with every term in thermo output order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermoReport {
    #[serde(rename = "E_bond")]
    pub ebond: f64,
    #[serde(rename = "E_angle")]
    pub eangle: f64,
    #[serde(rename = "E_dihed")]
    pub edihed: f64,
    #[serde(rename = "E_impro")]
    pub eimp: f64,
    #[serde(rename = "E_pair")]
    pub epair: f64,
    #[serde(rename = "E_vdwl")]
    pub evdwl: f64,
    #[serde(rename = "E_coul")]
    pub ecoul: f64,
    #[serde(rename = "E_long")]
    pub elong: f64,
    #[serde(rename = "E_tail")]
    pub etail: f64,
    #[serde(rename = "PotEng")]
    pub pe: f64,
}

/// Column headers in the order fields are serialized.
pub const THERMO_COLUMNS: [&str; 10] = [
    "E_bond", "E_angle", "E_dihed", "E_impro", "E_pair", "E_vdwl", "E_coul", "E_long",
    "E_tail", "PotEng",
];

impl ThermoReport {
    pub fn values(&self) -> [f64; 10] {
        [
            self.ebond,
            self.eangle,
            self.edihed,
            self.eimp,
            self.epair,
            self.evdwl,
            self.ecoul,
            self.elong,
            self.etail,
            self.pe,
        ]
    }

    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f64)> {
        THERMO_COLUMNS.into_iter().zip(self.values())
    }
}

impl From<&EnergyTerm> for ThermoReport {
    fn from(term: &EnergyTerm) -> Self {
        Self {
            ebond: term.bond,
            eangle: term.angle,
            edihed: term.dihedral,
            eimp: term.improper,
            epair: term.pair(),
            evdwl: term.vdw,
            ecoul: term.coulomb,
            elong: term.long_range,
            etail: term.tail,
            pe: term.total(),
        }
    }
}

/// Coarse grouping of the energy terms, as summarized after a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyGroups {
    #[serde(rename = "Dispersive")]
    pub dispersive: f64,
    #[serde(rename = "Electrostatic")]
    pub electrostatic: f64,
    #[serde(rename = "Non-bonded")]
    pub non_bonded: f64,
    #[serde(rename = "All dihedrals")]
    pub all_dihedrals: f64,
}

pub const GROUP_COLUMNS: [&str; 4] = ["Dispersive", "Electrostatic", "Non-bonded", "All dihedrals"];

impl EnergyGroups {
    pub fn values(&self) -> [f64; 4] {
        [
            self.dispersive,
            self.electrostatic,
            self.non_bonded,
            self.all_dihedrals,
        ]
    }

    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f64)> {
        GROUP_COLUMNS.into_iter().zip(self.values())
    }
}

impl From<&EnergyTerm> for EnergyGroups {
    fn from(term: &EnergyTerm) -> Self {
        let dispersive = term.vdw + term.tail;
        let electrostatic = term.coulomb + term.long_range;
        Self {
            dispersive,
            electrostatic,
            non_bonded: dispersive + electrostatic,
            all_dihedrals: term.dihedral + term.improper,
        }
    }
}
