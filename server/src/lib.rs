pub mod broadcast;
pub mod events;
pub mod plugins;
pub mod resources;
pub mod sim;
