pub mod fidspe;
pub mod series;
pub mod synth;
