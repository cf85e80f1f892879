//! Widgets for the demo screens.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>` for platform independence.

mod button;
mod chart;
mod gauge;
mod icons;

pub use button::Button;
pub use chart::draw_column_chart;
pub use gauge::draw_gauge;
pub use icons::draw_schedule_icon;
