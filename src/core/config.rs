use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What to do with bill allocations whose type matches no known role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnclassifiedPolicy {
    /// Emit no row. The amount still counts towards the child total.
    #[default]
    Exclude,
    /// Emit a row with a blank "Transaction Type" and the reference
    /// columns filled like a child row.
    BlankRole,
}

/// Source of the "Ref Date" column on child rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefDateSource {
    /// The voucher date.
    #[default]
    VoucherDate,
    /// The voucher's `REFERENCEDATE`, falling back to the voucher date.
    ReferenceDate,
}

/// Configuration for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Largest absolute imbalance still reported as verified. Zero means
    /// exact fixed-point equality.
    pub tolerance: Decimal,
    pub unclassified: UnclassifiedPolicy,
    pub ref_date: RefDateSource,
    /// Worksheet name used by the XLSX sink (max 31 chars).
    pub sheet_name: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::ZERO,
            unclassified: UnclassifiedPolicy::Exclude,
            ref_date: RefDateSource::VoucherDate,
            sheet_name: "Sheet1".into(),
        }
    }
}

/// Builder for [`ConvertConfig`].
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use tallyconv::{ConvertConfigBuilder, UnclassifiedPolicy};
///
/// let config = ConvertConfigBuilder::new()
///     .tolerance(Decimal::new(1, 2))
///     .unclassified(UnclassifiedPolicy::BlankRole)
///     .build();
/// assert_eq!(config.sheet_name, "Sheet1");
/// ```
#[derive(Debug, Default)]
pub struct ConvertConfigBuilder {
    config: ConvertConfig,
}

impl ConvertConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reconciliation tolerance. Negative values are taken as
    /// their absolute value.
    pub fn tolerance(mut self, tolerance: Decimal) -> Self {
        self.config.tolerance = tolerance.abs();
        self
    }

    pub fn unclassified(mut self, policy: UnclassifiedPolicy) -> Self {
        self.config.unclassified = policy;
        self
    }

    pub fn ref_date(mut self, source: RefDateSource) -> Self {
        self.config.ref_date = source;
        self
    }

    /// Set the worksheet name, truncated to the 31 characters Excel allows.
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.config.sheet_name = name.chars().take(31).collect();
        self
    }

    pub fn build(self) -> ConvertConfig {
        self.config
    }
}
