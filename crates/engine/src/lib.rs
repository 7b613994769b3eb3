pub mod basket;
pub mod calculator;
pub mod pipeline;
