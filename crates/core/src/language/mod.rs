pub mod normalize;
pub mod numbers;
pub mod rules;
