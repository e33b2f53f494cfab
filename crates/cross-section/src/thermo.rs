//! Closed-form thermodynamic formulas, one value at a time.
//!
//! Inputs use the model's native units: temperature in kelvin, pressure in
//! pascals, specific humidity as a mass fraction, wind in m/s. None of the
//! results are clamped.

/// Kelvin at 0 °C.
pub const ZERO_CELSIUS_K: f64 = 273.15;

/// m/s to mph.
pub const MS_TO_MPH: f64 = 2.23694;

/// Reference pressure for potential temperature (Pa).
pub const REFERENCE_PRESSURE_PA: f64 = 100_000.0;

/// Poisson exponent R/cp used for potential temperature.
pub const POISSON_EXPONENT: f64 = 0.286;

/// Specific heat of dry air at constant pressure used in theta-e.
pub const CP_DRY_AIR: f64 = 1005.7;

/// Ratio of molecular weights of water vapor and dry air.
pub const EPSILON: f64 = 0.622;

/// Relative humidity (%) from temperature, pressure and specific humidity.
///
/// Valid only for physically reasonable temperatures. Supersaturated values
/// above 100 are returned as computed.
pub fn relative_humidity(t: f64, p: f64, q: f64) -> f64 {
    0.263 * p * q / (17.67 * (t - ZERO_CELSIUS_K) / (t - 29.65)).exp()
}

pub fn kelvin_to_fahrenheit(t: f64) -> f64 {
    (t - ZERO_CELSIUS_K) * 9.0 / 5.0 + 32.0
}

/// Horizontal wind speed in mph from native u/v components.
pub fn wind_speed_mph(u: f64, v: f64) -> f64 {
    let u_mph = u * MS_TO_MPH;
    let v_mph = v * MS_TO_MPH;
    (u_mph * u_mph + v_mph * v_mph).sqrt()
}

/// Water vapor mixing ratio from specific humidity.
pub fn mixing_ratio(q: f64) -> f64 {
    q / (1.0 - q)
}

/// Potential temperature θ (K).
pub fn potential_temperature(t: f64, p: f64) -> f64 {
    t * (REFERENCE_PRESSURE_PA / p).powf(POISSON_EXPONENT)
}

/// Saturation vapor pressure over water (Pa).
pub fn saturation_vapor_pressure(t: f64) -> f64 {
    let ratio = ZERO_CELSIUS_K / t;
    611.657 * (24.921 * (1.0 - ratio)).exp() * ratio.powf(5.06)
}

/// Saturation mixing ratio from saturation vapor pressure and pressure.
pub fn saturation_mixing_ratio(e_sat: f64, p: f64) -> f64 {
    EPSILON * e_sat / p
}

/// Latent heat of vaporization approximation.
pub fn latent_heat_of_vaporization(t: f64) -> f64 {
    2834.1 - 0.29 * t - 0.004 * t * t
}

/// Equivalent potential temperature θe (K).
pub fn equivalent_potential_temperature(t: f64, p: f64) -> f64 {
    let theta = potential_temperature(t, p);
    let smr = saturation_mixing_ratio(saturation_vapor_pressure(t), p);
    let lv = latent_heat_of_vaporization(t);
    theta * (smr * lv / (CP_DRY_AIR * t)).exp()
}

/// Log-pressure vertical coordinate, `ln(P / 100)` (ln of hPa).
pub fn log_pressure(p: f64) -> f64 {
    (p / 100.0).ln()
}
