//! Compound-growth price projection.

/// Annual appreciation assumed when no rate is given.
pub const DEFAULT_ANNUAL_RATE: f64 = 0.04;

/// Project `current_price` forward by `years` of compound growth.
///
/// Returns `current_price * (1 + rate)^years`, where `rate` defaults to
/// [`DEFAULT_ANNUAL_RATE`]. Inputs are not validated: negative `years`
/// discount backwards and negative rates model depreciation.
pub fn project_future_price(current_price: f64, years: f64, annual_rate: Option<f64>) -> f64 {
    let rate = annual_rate.unwrap_or(DEFAULT_ANNUAL_RATE);
    current_price * (1.0 + rate).powf(years)
}
