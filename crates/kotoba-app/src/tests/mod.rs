mod api_tests;
mod controller_tests;
mod watchdog_tests;
