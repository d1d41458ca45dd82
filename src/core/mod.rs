pub mod banner;
pub mod calculator;
pub mod corrector;
pub mod engine;
pub mod validator;
