pub mod backup;
pub mod compose;
pub mod config;
pub mod health;
pub mod output;
pub mod pipeline;
pub mod prereq;
pub mod stack;
pub mod workspace;
