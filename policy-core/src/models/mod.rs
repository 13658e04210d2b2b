mod change_category;
mod income_bin;
mod reform_params;
mod result_table;
mod tax_variable;

pub use change_category::ChangeCategory;
pub use income_bin::{IncomeBin, DISTRIBUTION_BINS, STANDARD_BINS};
pub use reform_params::{AssumptionChange, BehaviorParams, ParamValue, PolicyChange, ReformParams};
pub use result_table::{ResultTable, TableError, WEIGHT_COLUMN};
pub use tax_variable::{InvalidTaxType, TaxType, DIFFERENCE_LABELS, TAX_VARIABLES};
