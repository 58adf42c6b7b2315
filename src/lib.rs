pub mod assets;
pub mod boss;
pub mod clock;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod player;
pub mod projectile;
pub mod rules;
