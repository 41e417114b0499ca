// Unit tests for services
mod gemini_client_test;


// Unit tests for API and config
mod config_test;
mod error_test;
