use super::params::LjParam;
use phf::phf_map;
use std::fmt;

/// Rule deriving unlike-type Lennard-Jones parameters from the per-type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixingRule {
    #[default]
    Geometric,
    Arithmetic,
    SixthPower,
}

static MIXING_RULES: phf::Map<&'static str, MixingRule> = phf_map! {
    "geometric" => MixingRule::Geometric,
    "arithmetic" => MixingRule::Arithmetic,
    "sixthpower" => MixingRule::SixthPower,
};

impl MixingRule {
    pub fn from_name(name: &str) -> Option<Self> {
        MIXING_RULES.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Geometric => "geometric",
            Self::Arithmetic => "arithmetic",
            Self::SixthPower => "sixthpower",
        }
    }

    /// Combines the parameters of two atom types.
    ///
    /// Mixing a type with itself returns the stored parameters unchanged, so
    /// `sqrt(x * x)` rounding never perturbs like-type interactions.
    pub fn mix(self, a: &LjParam, b: &LjParam) -> LjParam {
        if a == b {
            return *a;
        }
        match self {
            Self::Geometric => LjParam {
                epsilon: (a.epsilon * b.epsilon).sqrt(),
                sigma: (a.sigma * b.sigma).sqrt(),
            },
            Self::Arithmetic => LjParam {
                epsilon: (a.epsilon * b.epsilon).sqrt(),
                sigma: 0.5 * (a.sigma + b.sigma),
            },
            Self::SixthPower => {
                let sig_a3 = a.sigma.powi(3);
                let sig_b3 = b.sigma.powi(3);
                let sig_a6 = sig_a3 * sig_a3;
                let sig_b6 = sig_b3 * sig_b3;
                LjParam {
                    epsilon: 2.0 * (a.epsilon * b.epsilon).sqrt() * sig_a3 * sig_b3
                        / (sig_a6 + sig_b6),
                    sigma: (0.5 * (sig_a6 + sig_b6)).powf(1.0 / 6.0),
                }
            }
        }
    }
}

impl fmt::Display for MixingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
