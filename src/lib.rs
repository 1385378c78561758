pub mod config;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod scope;
pub mod statement;
pub mod token;
