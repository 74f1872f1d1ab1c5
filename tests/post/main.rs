mod emotion;
mod generator;
