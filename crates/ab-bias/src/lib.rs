//! `ab-bias` — admission bias functions.
//!
//! Turns an agent's energy state and a definition's declared energy range and
//! category into a soft admission weight in `[0.05, 1.0]`.  Callers compare
//! the weight against an admission threshold; the weight itself is never a
//! hard zero, which keeps occasional off-profile behavior possible.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`category`]  | `Category`, `IdleStaminaBias`, `EnergyRange`, `BiasSpec`    |
//! | [`curves`]    | tent, battery, and favour-low/high/centered curves          |
//! | [`table`]     | category/idle-tag lookup tables, `energy_bias`, `profile_bias` |
//!
//! # Blend summary
//!
//! ```text
//! IdleQuirk   0.55·tent(m) + 0.45·stamina_curve(stamina)   [+ 25% social band]
//! Play/Wander 0.50·tent(m) + 0.50·battery(stamina, 0.65, 0.22)
//! Social      0.40·tent(m) + 0.60·battery(social,  0.45, 0.25)
//! Special     0.45·tent(m) + 0.55·battery(mental,  0.60, 0.25)
//! ```

pub mod category;
pub mod curves;
pub mod table;


pub use category::{BiasSpec, Category, EnergyRange, IdleStaminaBias};
pub use curves::{
    MIN_BIAS, OUT_OF_RANGE_BIAS, battery_bias, favour_centered_battery, favour_high_battery,
    favour_low_battery, scalar_bias,
};
pub use table::{energy_bias, profile_bias};
