pub mod highlight;
pub mod render_settings;

pub use highlight::*;
pub use render_settings::*;
