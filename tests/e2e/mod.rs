mod helpers;
mod policy_tests;
mod scan_tests;
mod validate_tests;
