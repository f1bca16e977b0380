use std::fmt;

use serde::{Deserialize, Serialize};

/// The five inputs collected by the life event form, in display order.
///
/// The derived ordering follows declaration order, so maps keyed by
/// [`Field`] iterate top-to-bottom the way the form is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    EmployerName,
    AnnualGrossIncome,
    EmploymentStartDate,
    EmploymentEndDate,
    Notes,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Self::EmployerName,
        Self::AnnualGrossIncome,
        Self::EmploymentStartDate,
        Self::EmploymentEndDate,
        Self::Notes,
    ];

    /// Wire name used in the exported record and in error maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmployerName => "employerName",
            Self::AnnualGrossIncome => "annualGrossIncome",
            Self::EmploymentStartDate => "employmentStartDate",
            Self::EmploymentEndDate => "employmentEndDate",
            Self::Notes => "notes",
        }
    }

    /// Accepts either the wire name or its snake_case spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "employerName" | "employer_name" => Some(Self::EmployerName),
            "annualGrossIncome" | "annual_gross_income" => Some(Self::AnnualGrossIncome),
            "employmentStartDate" | "employment_start_date" => Some(Self::EmploymentStartDate),
            "employmentEndDate" | "employment_end_date" => Some(Self::EmploymentEndDate),
            "notes" => Some(Self::Notes),
            _ => None,
        }
    }

    /// Human-readable label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EmployerName => "Employer's Name",
            Self::AnnualGrossIncome => "Annual Gross Income (Amount)",
            Self::EmploymentStartDate => "Employment Start Date",
            Self::EmploymentEndDate => "Employment End Date",
            Self::Notes => "Notes",
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::EmploymentEndDate | Self::Notes)
    }
}

impl fmt::Display for Field {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
