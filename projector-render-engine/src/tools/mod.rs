pub mod hover;
pub mod picking;
pub mod selection;
