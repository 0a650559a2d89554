//! Fixed narrative inputs: survey figures, published statistics and scenario
//! paths that no provider serves. Charts read them as data, never as logic.

use chrono::NaiveDate;

/// US M2 money supply against bitcoin supply, both in trillions / millions.
pub mod supply {
    pub const YEARS: [i32; 7] = [2020, 2021, 2022, 2023, 2024, 2025, 2026];
    pub const M2_TRILLIONS: [f64; 7] = [15.4, 21.0, 21.7, 20.8, 21.2, 22.5, 24.1];
    pub const BTC_MILLIONS: [f64; 7] = [18.3, 18.7, 19.1, 19.4, 19.7, 19.9, 20.1];
}

/// Price of a cup of coffee and of one bitcoin, every other year.
pub mod coffee {
    pub const YEARS: [i32; 6] = [2016, 2018, 2020, 2022, 2024, 2026];
    pub const COFFEE_USD: [f64; 6] = [2.10, 2.30, 2.70, 3.10, 3.50, 3.80];
    pub const BTC_USD: [f64; 6] = [600.0, 6500.0, 15000.0, 30000.0, 65000.0, 68000.0];
}

/// Bitcoin needed for an average new car.
pub mod car {
    pub const YEARS: [&str; 5] = ["2016", "2019", "2022", "2024", "2026"];
    pub const BTC_PER_CAR: [f64; 5] = [32.4, 5.4, 3.0, 0.53, 0.72];
}

/// Straight-line realized price (aggregate cost basis) used as the floor.
pub mod realized {
    pub const START_USD: f64 = 15_000.0;
    pub const FLOOR_USD: f64 = 55_207.0;
}

/// Share of bitcoin supply by holder class, in percent.
pub mod ownership {
    pub const CLASSES: [&str; 2] = ["Retail (<1 BTC)", "Institutions / Heavy Holders"];
    pub const Y2022: [f64; 2] = [75.0, 25.0];
    pub const Y2026: [f64; 2] = [66.0, 34.0];
}

/// Chinese holdings of US treasuries, $ billions.
pub mod china {
    pub const YEARS: [i32; 8] = [2013, 2015, 2017, 2019, 2021, 2023, 2025, 2026];
    pub const HOLDINGS: [f64; 8] = [1320.0, 1250.0, 1150.0, 1070.0, 1040.0, 850.0, 750.0, 682.0];
}

/// Central-bank reserve shares, in percent.
pub mod reserves {
    pub const ASSETS: [&str; 2] = ["U.S. Treasuries", "Gold"];
    pub const DECADE_2010S: [f64; 2] = [32.0, 18.0];
    pub const FEB_2026: [f64; 2] = [23.0, 27.0];
}

/// Share of jobs exposed to AI, in percent.
pub mod job_exposure {
    pub const ECONOMIES: [&str; 2] = ["Advanced Economies\n(US, UK, CH)", "Low-Income Economies"];
    pub const EXPOSURE: [f64; 2] = [60.0, 26.0];
}

/// Training compute cost against a labor cost index.
pub mod automation {
    pub const YEARS: [i32; 8] = [2017, 2018, 2019, 2020, 2021, 2022, 2023, 2024];
    pub const AI_COSTS: [f64; 8] = [
        930.0,
        3288.0,
        160_000.0,
        3_000_000.0,
        10_000_000.0,
        15_000_000.0,
        100_000_000.0,
        200_000_000.0,
    ];
    pub const LABOR_INDEX: [f64; 8] = [100.0, 103.0, 106.0, 110.0, 115.0, 122.0, 128.0, 134.0];
}

/// Scenario multipliers used to extend the rotation chart past its last
/// real observation.
pub mod rotation {
    pub const BITCOIN_PEAK: f64 = 2.2;
    /// The peak followed by a 28% drawdown.
    pub const BITCOIN_END: f64 = 2.2 * 0.72;
    pub const SAFE_HAVEN_END: f64 = 1.35;
    pub const EQUITY_END: f64 = 1.15;
}

/// Calendar anchors of the February 2026 liquidity event.
pub mod events {
    use super::ymd;
    use chrono::NaiveDate;

    pub fn mechanical_crash() -> NaiveDate {
        ymd(2026, 2, 5)
    }

    pub fn everything_crash() -> NaiveDate {
        ymd(2026, 2, 12)
    }

    pub fn macro_crash() -> NaiveDate {
        ymd(2026, 2, 13)
    }

    /// Expiry of the February 2026 CME bitcoin future.
    pub fn cme_expiry() -> NaiveDate {
        ymd(2026, 2, 27)
    }

    /// Last day the rotation scenario is projected through.
    pub fn rotation_target() -> NaiveDate {
        ymd(2026, 2, 11)
    }
}

/// A calendar date from constants that are known to be valid.
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Years as numeric x coordinates.
pub fn years_x(years: &[i32]) -> Vec<f64> {
    years.iter().map(|&y| f64::from(y)).collect()
}
