use wasm_bindgen::prelude::*;

pub const CONFIG_JSON: &str = include_str!("../config/fruit.json");

reel_web::export_slot!(CONFIG_JSON, "fruit-slot");
