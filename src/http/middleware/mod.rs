pub mod transpile;

pub use transpile::transpile_middleware;
