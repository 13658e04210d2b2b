//! Policy and assumption inputs describing a reform run.
//!
//! These values only feed the narrative parts of a report. The simulation
//! itself has already applied them by the time results are read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A parameter value: a single number or one number per index
/// (filing status, deduction type, number of children).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(Decimal),
    Indexed(Vec<Decimal>),
}

/// One policy parameter changed in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyChange {
    /// Short parameter identifier, e.g. `STD`.
    pub name: String,
    pub long_name: String,
    /// Section of the tax code the parameter belongs to.
    #[serde(default)]
    pub section: Option<String>,
    /// Name of the index set for list values (`MARS`, `idedtype`, `EIC`).
    #[serde(default)]
    pub vi_name: Option<String>,
    pub year: i32,
    pub original: ParamValue,
    pub new: ParamValue,
}

impl PolicyChange {
    pub fn is_unchanged(&self) -> bool {
        self.original == self.new
    }
}

/// A growth or consumption assumption that differs from its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssumptionChange {
    pub name: String,
    pub year: i32,
    pub original: Decimal,
    pub new: Decimal,
}

/// Behavioral elasticities applied by a dynamic run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorParams {
    /// Substitution elasticity of taxable income.
    #[serde(default)]
    pub sub: Option<Decimal>,
    /// Income elasticity of taxable income.
    #[serde(default)]
    pub inc: Option<Decimal>,
    /// Semi-elasticity of long-term capital gains.
    #[serde(default)]
    pub cg: Option<Decimal>,
}

impl BehaviorParams {
    pub fn is_empty(&self) -> bool {
        self.sub.is_none() && self.inc.is_none() && self.cg.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReformParams {
    #[serde(default)]
    pub policy: Vec<PolicyChange>,
    /// Modifications to current law applied to both scenarios.
    #[serde(default)]
    pub base_policy: Vec<PolicyChange>,
    #[serde(default)]
    pub behavior: BehaviorParams,
    #[serde(default)]
    pub growth: Vec<AssumptionChange>,
    #[serde(default)]
    pub consumption: Vec<AssumptionChange>,
}

impl ReformParams {
    /// Distinct non-empty sections touched by the reform, in first-seen order.
    pub fn policy_areas(&self) -> Vec<&str> {
        let mut areas: Vec<&str> = Vec::new();
        for section in self.policy.iter().filter_map(|p| p.section.as_deref()) {
            if !section.is_empty() && !areas.contains(&section) {
                areas.push(section);
            }
        }
        areas
    }

    pub fn has_base_policy(&self) -> bool {
        !self.base_policy.is_empty()
    }
}
