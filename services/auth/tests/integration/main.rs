mod handler_test;
mod issue_test;
mod purge_test;
mod session_test;
