use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod config;
pub mod controls;
pub mod format;
pub mod game;
pub mod orrery;
pub mod propagator;
pub mod scale;
pub mod scenery;
pub mod selection;
pub mod state;

use game::SolarSystem;

orrery_web::export_game!(SolarSystem, "solar-system");
