use super::mixing::MixingRule;
use super::potentials;
use crate::core::models::system::MolecularSystem;
use crate::core::topology::special::BondSeparation;
use crate::core::utils::geometry::{BoxError, PeriodicBox};
use phf::phf_map;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Inconsistent or incomplete force-field settings, detected before any evaluation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Unknown unit style '{0}'")]
    UnknownUnits(String),
    #[error("Unknown boundary flag '{0}' (expected one of p, f, s, m)")]
    UnknownBoundary(String),
    #[error("Unknown pair style '{0}'")]
    UnknownPairStyle(String),
    #[error("Unknown mixing rule '{0}'")]
    UnknownMixingRule(String),
    #[error("Unknown bond style '{0}'")]
    UnknownBondStyle(String),
    #[error("Bond style '{0}' is declared more than once")]
    DuplicateBondStyle(String),
    #[error(
        "Bond type {bond_type} uses style '{style}', which is not declared in the bond style list"
    )]
    UndeclaredBondStyle { bond_type: usize, style: String },
    #[error(
        "Bond type {bond_type} does not name a style, but {declared} styles are declared"
    )]
    AmbiguousBondStyle { bond_type: usize, declared: usize },
    #[error("Invalid {section} type key '{key}' (expected a positive integer)")]
    InvalidTypeKey { section: &'static str, key: String },
    #[error("No pair coefficients for atom type {0}")]
    MissingTypeParameters(usize),
    #[error("No bond coefficients for bond type {0}")]
    MissingBondCoefficients(usize),
    #[error("Bond type {bond_type} ({style}) is missing parameter '{parameter}'")]
    MissingStyleParameter {
        bond_type: usize,
        style: &'static str,
        parameter: &'static str,
    },
    #[error("Bond type {bond_type} ({style}) does not accept parameter '{parameter}'")]
    UnexpectedStyleParameter {
        bond_type: usize,
        style: &'static str,
        parameter: &'static str,
    },
    #[error("Bond type {bond_type} ({style}) expects {expected} parameters, found {found}")]
    WrongParameterCount {
        bond_type: usize,
        style: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Invalid value {value} for '{name}'")]
    InvalidParameter { name: String, value: f64 },
    #[error("Special-bonds {channel} factor #{index} is {value}, expected a value in [0, 1]")]
    SpecialFactorOutOfRange {
        channel: &'static str,
        index: usize,
        value: f64,
    },
    #[error("Invalid box: {0}")]
    Geometry(#[from] BoxError),
}

/// Unit system; only the Coulomb conversion constant depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Real,
    Metal,
    Lj,
}

static UNIT_STYLES: phf::Map<&'static str, Units> = phf_map! {
    "real" => Units::Real,
    "metal" => Units::Metal,
    "lj" => Units::Lj,
};

impl Units {
    pub fn from_name(name: &str) -> Option<Self> {
        UNIT_STYLES.get(name).copied()
    }

    /// Coulomb prefactor `1 / (4 pi eps0)` in the unit system's energy and length units.
    pub fn coulomb_constant(self) -> f64 {
        match self {
            Self::Real => 332.06371,
            Self::Metal => 14.399645,
            Self::Lj => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStyle {
    /// Truncated 12-6 Lennard-Jones.
    LjCut,
    /// Truncated 12-6 Lennard-Jones plus truncated point-charge Coulomb.
    LjCutCoulCut,
}

static PAIR_STYLES: phf::Map<&'static str, PairStyle> = phf_map! {
    "lj/cut" => PairStyle::LjCut,
    "lj/cut/coul/cut" => PairStyle::LjCutCoulCut,
};

impl PairStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        PAIR_STYLES.get(name).copied()
    }

    pub fn has_coulomb(self) -> bool {
        matches!(self, Self::LjCutCoulCut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondStyleKind {
    Harmonic,
    Morse,
}

static BOND_STYLES: phf::Map<&'static str, BondStyleKind> = phf_map! {
    "harmonic" => BondStyleKind::Harmonic,
    "morse" => BondStyleKind::Morse,
};

impl BondStyleKind {
    pub fn from_name(name: &str) -> Option<Self> {
        BOND_STYLES.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Harmonic => "harmonic",
            Self::Morse => "morse",
        }
    }

    /// Coefficient names in data-file column order.
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Self::Harmonic => &["k", "r0"],
            Self::Morse => &["d0", "alpha", "r0"],
        }
    }
}

/// Resolved coefficients of one bond type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BondStyle {
    Harmonic { k: f64, r0: f64 },
    Morse { d0: f64, alpha: f64, r0: f64 },
}

impl BondStyle {
    fn from_values(kind: BondStyleKind, values: &[f64]) -> Self {
        match kind {
            BondStyleKind::Harmonic => Self::Harmonic {
                k: values[0],
                r0: values[1],
            },
            BondStyleKind::Morse => Self::Morse {
                d0: values[0],
                alpha: values[1],
                r0: values[2],
            },
        }
    }

    pub fn kind(&self) -> BondStyleKind {
        match self {
            Self::Harmonic { .. } => BondStyleKind::Harmonic,
            Self::Morse { .. } => BondStyleKind::Morse,
        }
    }

    #[inline]
    pub fn energy(&self, dist: f64) -> f64 {
        match *self {
            Self::Harmonic { k, r0 } => potentials::harmonic_bond(dist, k, r0),
            Self::Morse { d0, alpha, r0 } => potentials::morse_bond(dist, d0, alpha, r0),
        }
    }

    #[inline]
    pub fn derivative(&self, dist: f64) -> f64 {
        match *self {
            Self::Harmonic { k, r0 } => potentials::harmonic_bond_derivative(dist, k, r0),
            Self::Morse { d0, alpha, r0 } => {
                potentials::morse_bond_derivative(dist, d0, alpha, r0)
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LjParam {
    pub epsilon: f64,
    pub sigma: f64,
}

/// Scaling factors for 1-2, 1-3 and 1-4 neighbors, per interaction channel.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpecialBonds {
    #[serde(default)]
    pub lj: [f64; 3],
    #[serde(default)]
    pub coul: [f64; 3],
}

impl Default for SpecialBonds {
    fn default() -> Self {
        Self {
            lj: [0.0; 3],
            coul: [0.0; 3],
        }
    }
}

impl SpecialBonds {
    #[inline]
    pub fn vdw_factor(&self, separation: Option<BondSeparation>) -> f64 {
        separation.map_or(1.0, |s| self.lj[s.index()])
    }

    #[inline]
    pub fn coulomb_factor(&self, separation: Option<BondSeparation>) -> f64 {
        separation.map_or(1.0, |s| self.coul[s.index()])
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        for (channel, factors) in [("lj", &self.lj), ("coul", &self.coul)] {
            for (index, &value) in factors.iter().enumerate() {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigurationError::SpecialFactorOutOfRange {
                        channel,
                        index: index + 1,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct GlobalSettings {
    #[serde(default = "default_units")]
    pub units: String,
    /// One flag per axis: `p` is periodic, `f`, `s` and `m` are not.
    #[serde(default = "default_boundary")]
    pub boundary: [String; 3],
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            units: default_units(),
            boundary: default_boundary(),
        }
    }
}

fn default_units() -> String {
    "real".to_string()
}

fn default_boundary() -> [String; 3] {
    ["p", "p", "p"].map(String::from)
}

static BOUNDARY_FLAGS: phf::Map<&'static str, bool> = phf_map! {
    "p" => true,
    "f" => false,
    "s" => false,
    "m" => false,
};

/// Per-axis periodicity from boundary flags.
fn parse_boundary(flags: &[String; 3]) -> Result<[bool; 3], ConfigurationError> {
    let mut periodic = [true; 3];
    for (axis, flag) in flags.iter().enumerate() {
        periodic[axis] = BOUNDARY_FLAGS
            .get(flag.as_str())
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownBoundary(flag.clone()))?;
    }
    Ok(periodic)
}

fn default_mixing() -> String {
    MixingRule::default().name().to_string()
}

fn default_dielectric() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PairSettings {
    pub style: String,
    pub cutoff: f64,
    /// Defaults to `cutoff`. Only read by styles with a Coulomb term.
    pub coulomb_cutoff: Option<f64>,
    #[serde(default = "default_mixing")]
    pub mixing: String,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub tail: bool,
    #[serde(default = "default_dielectric")]
    pub dielectric: f64,
    #[serde(default)]
    pub coeffs: BTreeMap<String, LjParam>,
}

/// Bond coefficients as written in the settings file, with named parameters.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BondCoeffSpec {
    pub style: Option<String>,
    pub k: Option<f64>,
    pub r0: Option<f64>,
    pub d0: Option<f64>,
    pub alpha: Option<f64>,
}

impl BondCoeffSpec {
    fn get(&self, name: &str) -> Option<f64> {
        match name {
            "k" => self.k,
            "r0" => self.r0,
            "d0" => self.d0,
            "alpha" => self.alpha,
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct BondSettings {
    /// Sub-styles a hybrid bond style may dispatch to.
    pub styles: Vec<String>,
    #[serde(default)]
    pub coeffs: BTreeMap<String, BondCoeffSpec>,
}

/// Raw contents of a force-field settings file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ForcefieldSettings {
    #[serde(default)]
    pub globals: GlobalSettings,
    pub pair: PairSettings,
    #[serde(default)]
    pub special_bonds: SpecialBonds,
    pub bond: Option<BondSettings>,
}

impl ForcefieldSettings {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }
}

/// Bond coefficients as written in a data file: an optional style name followed by
/// positional values.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalBondCoeff {
    pub style: Option<String>,
    pub values: Vec<f64>,
}

/// Coefficients embedded in a data file (`Pair Coeffs` and `Bond Coeffs` sections).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoefficientTable {
    pub pair: BTreeMap<usize, LjParam>,
    pub bond: BTreeMap<usize, PositionalBondCoeff>,
}

/// Fully validated force field ready for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Forcefield {
    pub units: Units,
    /// Periodic flag per axis, applied to the box of systems read from a data file.
    pub periodicity: [bool; 3],
    pub pair_style: PairStyle,
    pub cutoff: f64,
    pub coulomb_cutoff: f64,
    pub mixing: MixingRule,
    pub shift: bool,
    pub tail: bool,
    pub dielectric: f64,
    pub special_bonds: SpecialBonds,
    pub bond_styles: Vec<BondStyleKind>,
    pub pair_coeffs: BTreeMap<usize, LjParam>,
    pub bond_coeffs: BTreeMap<usize, BondStyle>,
}

fn parse_type_key(section: &'static str, key: &str) -> Result<usize, ConfigurationError> {
    match key.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigurationError::InvalidTypeKey {
            section,
            key: key.to_string(),
        }),
    }
}

fn check_positive(name: &str, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::InvalidParameter {
            name: name.to_string(),
            value,
        })
    }
}

fn check_lj_param(type_id: usize, param: &LjParam) -> Result<(), ConfigurationError> {
    check_positive(&format!("sigma of atom type {}", type_id), param.sigma)?;
    if !param.epsilon.is_finite() || param.epsilon < 0.0 {
        return Err(ConfigurationError::InvalidParameter {
            name: format!("epsilon of atom type {}", type_id),
            value: param.epsilon,
        });
    }
    Ok(())
}

impl Forcefield {
    /// Validates settings and merges them with data-file coefficients.
    ///
    /// Coefficients from the settings file take precedence over data-file ones for the
    /// same type.
    pub fn from_settings(
        settings: &ForcefieldSettings,
        data_coeffs: &CoefficientTable,
    ) -> Result<Self, ConfigurationError> {
        let units = Units::from_name(&settings.globals.units)
            .ok_or_else(|| ConfigurationError::UnknownUnits(settings.globals.units.clone()))?;
        let periodicity = parse_boundary(&settings.globals.boundary)?;
        let pair = &settings.pair;
        let pair_style = PairStyle::from_name(&pair.style)
            .ok_or_else(|| ConfigurationError::UnknownPairStyle(pair.style.clone()))?;
        let mixing = MixingRule::from_name(&pair.mixing)
            .ok_or_else(|| ConfigurationError::UnknownMixingRule(pair.mixing.clone()))?;
        let cutoff = check_positive("pair.cutoff", pair.cutoff)?;
        let coulomb_cutoff = match pair.coulomb_cutoff {
            Some(value) => check_positive("pair.coulomb-cutoff", value)?,
            None => cutoff,
        };
        let dielectric = check_positive("pair.dielectric", pair.dielectric)?;
        settings.special_bonds.validate()?;

        let mut pair_coeffs = BTreeMap::new();
        for (&type_id, param) in &data_coeffs.pair {
            check_lj_param(type_id, param)?;
            pair_coeffs.insert(type_id, *param);
        }
        for (key, param) in &pair.coeffs {
            let type_id = parse_type_key("pair", key)?;
            check_lj_param(type_id, param)?;
            pair_coeffs.insert(type_id, *param);
        }

        let bond_styles = match &settings.bond {
            Some(bond) => Self::declared_bond_styles(&bond.styles)?,
            None => Vec::new(),
        };
        let mut bond_coeffs = BTreeMap::new();
        for (&bond_type, coeff) in &data_coeffs.bond {
            let kind = Self::resolve_style(&bond_styles, bond_type, coeff.style.as_deref())?;
            let expected = kind.parameter_names().len();
            if coeff.values.len() != expected {
                return Err(ConfigurationError::WrongParameterCount {
                    bond_type,
                    style: kind.name(),
                    expected,
                    found: coeff.values.len(),
                });
            }
            bond_coeffs.insert(bond_type, BondStyle::from_values(kind, &coeff.values));
        }
        if let Some(bond) = &settings.bond {
            for (key, spec) in &bond.coeffs {
                let bond_type = parse_type_key("bond", key)?;
                let kind = Self::resolve_style(&bond_styles, bond_type, spec.style.as_deref())?;
                bond_coeffs.insert(bond_type, Self::named_bond_style(bond_type, kind, spec)?);
            }
        }

        Ok(Self {
            units,
            periodicity,
            pair_style,
            cutoff,
            coulomb_cutoff,
            mixing,
            shift: pair.shift,
            tail: pair.tail,
            dielectric,
            special_bonds: settings.special_bonds,
            bond_styles,
            pair_coeffs,
            bond_coeffs,
        })
    }

    fn declared_bond_styles(names: &[String]) -> Result<Vec<BondStyleKind>, ConfigurationError> {
        let mut kinds = Vec::with_capacity(names.len());
        for name in names {
            let kind = BondStyleKind::from_name(name)
                .ok_or_else(|| ConfigurationError::UnknownBondStyle(name.clone()))?;
            if kinds.contains(&kind) {
                return Err(ConfigurationError::DuplicateBondStyle(name.clone()));
            }
            kinds.push(kind);
        }
        Ok(kinds)
    }

    fn resolve_style(
        declared: &[BondStyleKind],
        bond_type: usize,
        style: Option<&str>,
    ) -> Result<BondStyleKind, ConfigurationError> {
        let kind = match style {
            Some(name) => BondStyleKind::from_name(name)
                .ok_or_else(|| ConfigurationError::UnknownBondStyle(name.to_string()))?,
            None => match declared {
                [single] => *single,
                _ => {
                    return Err(ConfigurationError::AmbiguousBondStyle {
                        bond_type,
                        declared: declared.len(),
                    });
                }
            },
        };
        if !declared.contains(&kind) {
            return Err(ConfigurationError::UndeclaredBondStyle {
                bond_type,
                style: kind.name().to_string(),
            });
        }
        Ok(kind)
    }

    fn named_bond_style(
        bond_type: usize,
        kind: BondStyleKind,
        spec: &BondCoeffSpec,
    ) -> Result<BondStyle, ConfigurationError> {
        let names = kind.parameter_names();
        for parameter in ["k", "r0", "d0", "alpha"] {
            if !names.contains(&parameter) && spec.get(parameter).is_some() {
                return Err(ConfigurationError::UnexpectedStyleParameter {
                    bond_type,
                    style: kind.name(),
                    parameter,
                });
            }
        }
        let values = names
            .iter()
            .map(|&parameter| {
                spec.get(parameter)
                    .ok_or(ConfigurationError::MissingStyleParameter {
                        bond_type,
                        style: kind.name(),
                        parameter,
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(BondStyle::from_values(kind, &values))
    }

    pub fn pair_param(&self, type_id: usize) -> Option<&LjParam> {
        self.pair_coeffs.get(&type_id)
    }

    pub fn bond_style(&self, bond_type: usize) -> Option<&BondStyle> {
        self.bond_coeffs.get(&bond_type)
    }

    pub fn coulomb_constant(&self) -> f64 {
        self.units.coulomb_constant()
    }

    /// Largest interaction range of the pair style.
    pub fn max_cutoff(&self) -> f64 {
        if self.pair_style.has_coulomb() {
            self.cutoff.max(self.coulomb_cutoff)
        } else {
            self.cutoff
        }
    }

    /// Checks that every type and bond type of `system` has coefficients and that the
    /// cutoff fits the box.
    pub fn check_system(&self, system: &MolecularSystem) -> Result<(), ConfigurationError> {
        self.check_box(system.periodic_box())?;
        if let Some(type_id) = system
            .atom_types()
            .into_iter()
            .find(|type_id| !self.pair_coeffs.contains_key(type_id))
        {
            return Err(ConfigurationError::MissingTypeParameters(type_id));
        }
        if let Some(bond_type) = system
            .bond_types()
            .into_iter()
            .find(|bond_type| !self.bond_coeffs.contains_key(bond_type))
        {
            return Err(ConfigurationError::MissingBondCoefficients(bond_type));
        }
        Ok(())
    }

    pub fn check_box(&self, periodic_box: &PeriodicBox) -> Result<(), ConfigurationError> {
        periodic_box.validate_cutoff(self.max_cutoff())?;
        Ok(())
    }
}
