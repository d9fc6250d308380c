//! Constants for attribute sample size calculations

/// Formula constants for the binomial sample size approximation
pub mod formula {
    /// Tolerable deviation substituted when a non-positive rate is supplied
    pub const DEFAULT_TOLERABLE_DEVIATION: f64 = 0.05;

    /// Smallest sample the estimator will ever recommend
    pub const MIN_SAMPLE_SIZE: u64 = 5;

    /// Populations below this size are scaled down proportionally
    pub const SMALL_POPULATION_THRESHOLD: u64 = 1000;

    /// Multiplier applied to the expected deviation when inflating the sample
    pub const DEVIATION_INFLATION_MULTIPLIER: f64 = 2.0;

    /// Divisor for converting a confidence percentage to a fraction
    pub const PERCENT_DIVISOR: f64 = 100.0;
}

/// Bounds on rates accepted at the boundary
pub mod rates {
    /// Lowest admissible deviation rate
    pub const MIN_RATE: f64 = 0.0;

    /// Tolerable rates must stay strictly below this
    pub const TOLERABLE_LIMIT: f64 = 1.0;

    /// Decimal places used when echoing derived rates
    pub const EXPORT_DECIMAL_PLACES: i32 = 4;
}

/// Default field values offered before a user has entered anything
pub mod input_defaults {
    pub const POPULATION: &str = "5000";
    pub const CONFIDENCE: &str = "90%";
    pub const EXPECTED_DEVIATION: &str = "0.00";
    pub const TOLERABLE_DEVIATION: &str = "0.05";
    pub const INTERIM_SAMPLE_SIZE: &str = "45";
    pub const EXCEPTION_COUNT: &str = "0";
    pub const ROLLFORWARD_POPULATION: &str = "1000";
}

/// Professional judgment reminder emitted when interim exceptions were found
pub const ADVISORY_NOTE: &str = "Note: Interim exceptions increased the expected deviation used for planning. \
Consider the nature and cause of deviations and whether additional procedures \
are required (AU-C 530 / PCAOB AS 2315).";
