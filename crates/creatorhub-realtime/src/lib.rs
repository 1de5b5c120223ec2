//! Simulated realtime behaviour: event fan-out, typing indicators, delayed
//! delivery receipts and a background generator of incoming messages.

pub mod delivery;
pub mod dispatcher;
pub mod simulator;

pub use delivery::DeliverySimulator;
pub use dispatcher::Dispatcher;
pub use simulator::{IncomingSimulator, SimulatorConfig, SimulatorHandle};
