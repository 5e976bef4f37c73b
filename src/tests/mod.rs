mod availability_tests;
mod config_tests;
mod orchestrator_tests;
mod pool_tests;
mod search_tests;
mod utils;
