// Adapters layer: concrete storage backends for the domain ports.

pub mod memory;
