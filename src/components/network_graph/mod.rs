mod component;
mod fit;
mod physics;
mod render;
mod state;
mod theme;

pub use component::{GraphRuntime, NetworkGraphCanvas};
pub use physics::PhysicsSettings;
pub use theme::Theme;
