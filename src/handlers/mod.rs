pub mod generate;
pub mod health;
mod helpers;
pub mod serverless;
