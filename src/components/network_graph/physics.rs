use force_graph::SimulationParameters;

/// Fixed simulation constants for the case graph.
///
/// Velocities are in graph units per second. The simulation stops once the
/// fastest node drops below `min_velocity`, or after `max_iterations` ticks.
/// `central_gravity` is the fraction of its distance from the origin a node
/// is pulled back per second, which keeps disconnected pieces from drifting
/// apart forever.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsSettings {
	pub gravitational_constant: f32,
	pub central_gravity: f64,
	pub spring_length: f64,
	pub spring_constant: f32,
	pub damping: f32,
	pub min_velocity: f64,
	pub max_velocity: f64,
	pub max_iterations: u32,
	pub force_max: f32,
	pub node_speed: f32,
}

impl Default for PhysicsSettings {
	fn default() -> Self {
		Self {
			gravitational_constant: 150.0,
			central_gravity: 1.0,
			spring_length: 90.0,
			spring_constant: 0.05,
			damping: 0.9,
			min_velocity: 5.0,
			max_velocity: 400.0,
			max_iterations: 1000,
			force_max: 100.0,
			node_speed: 3000.0,
		}
	}
}

impl PhysicsSettings {
	pub fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.gravitational_constant,
			force_spring: self.spring_constant,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping,
		}
	}
}
