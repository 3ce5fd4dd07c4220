use appraise_model::projection::{project_future_price, DEFAULT_ANNUAL_RATE};

/// Projected price rendered with two decimals, as printed by `appraise project`.
pub fn format_projection(price: f64, years: f64, annual_rate: Option<f64>) -> String {
    let projected = project_future_price(price, years, annual_rate);
    log::debug!(
        "Projecting {} over {} years at {}",
        price,
        years,
        annual_rate.unwrap_or(DEFAULT_ANNUAL_RATE)
    );
    format!("{:.2}", projected)
}
