pub mod daily_frequency;
pub mod dis;
pub mod dq5;
pub mod thomas_stonell;
